//! Arbor Cryptographic Primitives
//!
//! This crate provides the building blocks underneath the Arbor
//! range-constrained PRF: secret buffers, a domain-separated PRG, an HMAC
//! PRF, hashing and authenticated encryption.
//!
//! # Design
//!
//! All functions in this crate are pure. They have no side effects and
//! produce deterministic outputs given the same inputs; the only exceptions
//! are the explicitly named `random*` helpers, which read OS entropy.
//!
//! # Security Properties
//!
//! - Single ownership: [`SecretKey`] is move-only and never implicitly
//!   copied
//! - Erasure: every secret buffer is zeroized when erased or dropped,
//!   including on error paths
//! - Domain separation: PRG outputs for different [`DomainTag`]s are
//!   independent

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cipher;
pub mod error;
pub mod hash;
pub mod key;
pub mod prf;
pub mod prg;
pub mod random;

pub use cipher::Cipher;
pub use error::CryptoError;
pub use hash::Hash;
pub use key::SecretKey;
pub use prf::Prf;
pub use prg::{DomainTag, PRG_KEY_SIZE, PRG_MAX_OUTPUT, Prg, Side};
pub use random::{random_array, random_bytes};

//! Arbor Range-Constrained PRF
//!
//! A keyed function over the `2^depth` leaves of a binary GGM tree. The
//! holder of the root key can hand out *constrained* capabilities that
//! evaluate only the leaves of a contiguous range `[min, max]`, and every
//! capability can itself be narrowed further without going back to the
//! root.
//!
//! # Design
//!
//! Node keys are expanded by the [`arbor_crypto::Prg`] into left and right
//! children; a leaf key is expanded into `N` output bytes. A constrained
//! capability stores one key per maximal aligned block of its range (see
//! [`ConstrainedElement`]), so it holds `O(depth)` keys and learns nothing
//! about leaves outside its range.
//!
//! All operations are synchronous and purely computational. `eval` and
//! `constrain` never mutate the receiver.
//!
//! # Security Properties
//!
//! - Consistency: every capability covering a leaf evaluates it to the same
//!   output as the root
//! - Isolation: no capability contains an ancestor of a leaf outside its
//!   range
//! - Erasure: node keys are wiped as soon as their children are derived, and
//!   every stored key is wiped on drop
//!
//! # Example
//!
//! ```
//! use arbor_crypto::SecretKey;
//! use arbor_rcprf::RcPrf;
//!
//! let mut root_key = [0u8; 32];
//! let prf = RcPrf::<16>::new(SecretKey::from_array(&mut root_key), 7)?;
//! let delegated = prf.constrain(4, 7)?;
//! assert_eq!(delegated.eval(5)?, prf.eval(5)?);
//! assert!(delegated.eval(3).is_err());
//!
//! let narrowed = delegated.constrain(5, 6)?;
//! assert_eq!(narrowed.eval(6)?, prf.eval(6)?);
//! # Ok::<(), arbor_rcprf::RcPrfError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod constrained;
pub mod element;
pub mod error;
pub mod params;
mod rcprf;
mod tree;

pub use constrained::ConstrainedRcPrf;
pub use element::{ConstrainedElement, InnerElement, LeafElement};
pub use error::{ErrorKind, RcPrfError};
pub use params::{Depth, RcPrfParams};
pub use rcprf::{RCPRF_KEY_SIZE, RcPrf};

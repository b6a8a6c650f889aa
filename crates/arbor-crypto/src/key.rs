//! Move-only secret buffers.
//!
//! [`SecretKey`] owns a fixed-size secret on the heap. It cannot be cloned or
//! copied; the only way to read it is through [`SecretKey::with_unlocked`],
//! and the bytes are overwritten when the key is erased or dropped.
//!
//! # Invariants
//!
//! - Exactly one owner: ownership transfers by move, duplicates must be
//!   requested explicitly with [`SecretKey::duplicate`]
//! - No stray copies: the buffer is boxed so moving a key moves a pointer,
//!   and [`SecretKey::from_array`] and [`SecretKey::from_slice`] wipe the
//!   caller's buffer
//! - Wipe on every exit: drop zeroizes, including on error paths

use std::fmt;

use zeroize::Zeroize;

use crate::{error::CryptoError, random};

/// Fixed-size secret key material.
pub struct SecretKey<const N: usize> {
    bytes: Box<[u8; N]>,
}

impl<const N: usize> SecretKey<N> {
    /// Key size in bytes.
    pub const SIZE: usize = N;

    /// Builds a key from an array passed by value.
    ///
    /// Arrays are `Copy`, so the caller's binding keeps its bytes; only the
    /// local copy is wiped. Use [`SecretKey::from_array`] for material that
    /// must not outlive the key.
    pub fn from_bytes(mut bytes: [u8; N]) -> Self {
        let key = Self { bytes: Box::new(bytes) };
        bytes.zeroize();
        key
    }

    /// Copies key material out of `src` and wipes it.
    pub fn from_array(src: &mut [u8; N]) -> Self {
        let key = Self { bytes: Box::new(*src) };
        src.zeroize();
        key
    }

    /// Copies key material out of `src` and wipes the source slice.
    ///
    /// Fails if `src` is not exactly `N` bytes long; the source is left
    /// untouched in that case.
    pub fn from_slice(src: &mut [u8]) -> Result<Self, CryptoError> {
        if src.len() != N {
            return Err(CryptoError::InvalidArgument {
                reason: format!("key must be {N} bytes, got {}", src.len()),
            });
        }

        let mut bytes = Box::new([0u8; N]);
        bytes.copy_from_slice(src);
        src.zeroize();
        Ok(Self { bytes })
    }

    /// Builds a key by letting `fill` write directly into the new buffer.
    ///
    /// If `fill` fails the partially written buffer is wiped before the
    /// error is returned.
    pub fn from_fn<F>(fill: F) -> Result<Self, CryptoError>
    where
        F: FnOnce(&mut [u8; N]) -> Result<(), CryptoError>,
    {
        let mut key = Self { bytes: Box::new([0u8; N]) };
        fill(&mut *key.bytes)?;
        Ok(key)
    }

    /// Generates a fresh key from the OS entropy source.
    pub fn random() -> Result<Self, CryptoError> {
        Self::from_fn(|buf| random::random_bytes(buf))
    }

    /// Runs `f` with read access to the key bytes.
    ///
    /// The reference cannot escape the closure.
    pub fn with_unlocked<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&[u8; N]) -> R,
    {
        f(&self.bytes)
    }

    /// Returns an independently owned copy of this key.
    pub fn duplicate(&self) -> Self {
        let mut bytes = Box::new([0u8; N]);
        bytes.copy_from_slice(&self.bytes[..]);
        Self { bytes }
    }

    /// Wipes and consumes the key.
    pub fn erase(self) {
        drop(self);
    }
}

impl<const N: usize> Drop for SecretKey<N> {
    fn drop(&mut self) {
        (*self.bytes).zeroize();
    }
}

impl<const N: usize> fmt::Debug for SecretKey<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey<{N}>(<redacted>)")
    }
}

//! SHA-512 hashing.

use sha2::{Digest, Sha512};

use crate::error::CryptoError;

/// Stateless SHA-512 helper.
pub struct Hash;

impl Hash {
    /// Digest size in bytes.
    pub const DIGEST_SIZE: usize = 64;

    /// Internal block size in bytes.
    pub const BLOCK_SIZE: usize = 128;

    /// Full SHA-512 digest of `input`.
    pub fn hash(input: &[u8]) -> [u8; Self::DIGEST_SIZE] {
        let mut out = [0u8; Self::DIGEST_SIZE];
        out.copy_from_slice(&Sha512::digest(input));
        out
    }

    /// First `out_len` bytes of the SHA-512 digest of `input`.
    pub fn hash_truncated(input: &[u8], out_len: usize) -> Result<Vec<u8>, CryptoError> {
        if out_len > Self::DIGEST_SIZE {
            return Err(CryptoError::InvalidArgument {
                reason: format!(
                    "truncated hash length {out_len} exceeds digest size {}",
                    Self::DIGEST_SIZE
                ),
            });
        }

        let digest = Self::hash(input);
        Ok(digest[..out_len].to_vec())
    }
}

//! Authenticated symmetric encryption.
//!
//! XChaCha20-Poly1305 with a 24-byte nonce carried in front of the sealed
//! payload:
//!
//! ```text
//! ┌──────────────┬──────────────────────────┬──────────┐
//! │ nonce (24 B) │ encrypted plaintext      │ tag 16 B │
//! └──────────────┴──────────────────────────┴──────────┘
//! ```
//!
//! The nonce is an explicit argument of [`Cipher::encrypt`] so tests can be
//! deterministic; [`Cipher::encrypt_random`] draws it from the OS.

use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit},
};

use crate::{error::CryptoError, key::SecretKey, random};

/// Cipher key size in bytes.
pub const CIPHER_KEY_SIZE: usize = 32;

/// Cipher nonce size in bytes.
pub const CIPHER_NONCE_SIZE: usize = 24;

/// Symmetric cipher keyed with a 32-byte secret.
#[derive(Debug)]
pub struct Cipher {
    key: SecretKey<CIPHER_KEY_SIZE>,
}

impl Cipher {
    /// Key size in bytes.
    pub const KEY_SIZE: usize = CIPHER_KEY_SIZE;

    /// Nonce size in bytes.
    pub const NONCE_SIZE: usize = CIPHER_NONCE_SIZE;

    /// Authentication tag size in bytes.
    pub const TAG_SIZE: usize = 16;

    const OVERHEAD: usize = Self::NONCE_SIZE + Self::TAG_SIZE;

    /// Wraps `key`.
    pub fn new(key: SecretKey<CIPHER_KEY_SIZE>) -> Self {
        Self { key }
    }

    /// Ciphertext length for a plaintext of `plaintext_len` bytes.
    pub const fn ciphertext_length(plaintext_len: usize) -> usize {
        plaintext_len + Self::OVERHEAD
    }

    /// Plaintext length for a ciphertext of `ciphertext_len` bytes, or `0`
    /// if the ciphertext cannot hold any plaintext.
    pub const fn plaintext_length(ciphertext_len: usize) -> usize {
        ciphertext_len.saturating_sub(Self::OVERHEAD)
    }

    /// Encrypts `plaintext` under `nonce`.
    ///
    /// A nonce must never be reused with the same key.
    pub fn encrypt(
        &self,
        plaintext: &[u8],
        nonce: [u8; CIPHER_NONCE_SIZE],
    ) -> Result<Vec<u8>, CryptoError> {
        if plaintext.is_empty() {
            return Err(CryptoError::InvalidArgument {
                reason: "plaintext must not be empty".to_string(),
            });
        }

        let sealed = self.key.with_unlocked(|key| {
            let aead = aead_for(key)?;
            aead.encrypt(XNonce::from_slice(&nonce), plaintext).map_err(|_| {
                CryptoError::InvalidArgument { reason: "plaintext too long".to_string() }
            })
        })?;

        let mut out = Vec::with_capacity(Self::NONCE_SIZE + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        Ok(out)
    }

    /// Encrypts `plaintext` under a fresh random nonce.
    pub fn encrypt_random(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let nonce = random::random_array::<CIPHER_NONCE_SIZE>()?;
        self.encrypt(plaintext, nonce)
    }

    /// Authenticates and decrypts `ciphertext`.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if ciphertext.len() <= Self::OVERHEAD {
            return Err(CryptoError::InvalidArgument {
                reason: format!(
                    "ciphertext of {} bytes is shorter than the minimum {}",
                    ciphertext.len(),
                    Self::OVERHEAD + 1
                ),
            });
        }

        let (nonce, sealed) = ciphertext.split_at(Self::NONCE_SIZE);
        self.key.with_unlocked(|key| {
            let aead = aead_for(key)?;
            aead.decrypt(XNonce::from_slice(nonce), sealed)
                .map_err(|_| CryptoError::DecryptionFailed)
        })
    }
}

fn aead_for(key: &[u8; CIPHER_KEY_SIZE]) -> Result<XChaCha20Poly1305, CryptoError> {
    XChaCha20Poly1305::new_from_slice(key).map_err(|_| CryptoError::InvalidArgument {
        reason: format!("cipher key must be {CIPHER_KEY_SIZE} bytes"),
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn zero_cipher() -> Cipher {
        Cipher::new(SecretKey::from_bytes([0u8; Cipher::KEY_SIZE]))
    }

    #[test]
    fn decrypt_inverts_encrypt() {
        let cipher = zero_cipher();
        let plaintext = b"This is a test input.";

        let ciphertext = cipher.encrypt(plaintext, [1u8; Cipher::NONCE_SIZE]).expect("encrypt");
        assert_eq!(ciphertext.len(), Cipher::ciphertext_length(plaintext.len()));

        let decrypted = cipher.decrypt(&ciphertext).expect("decrypt");
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn random_nonces_differ() {
        let cipher = zero_cipher();
        let a = cipher.encrypt_random(b"same").expect("encrypt");
        let b = cipher.encrypt_random(b"same").expect("encrypt");
        assert_ne!(a, b);
    }

    #[test]
    fn length_helpers() {
        assert_eq!(Cipher::plaintext_length(0), 0);
        assert_eq!(Cipher::plaintext_length(Cipher::ciphertext_length(10)), 10);
    }

    #[test]
    fn empty_plaintext_rejected() {
        let err = zero_cipher().encrypt(b"", [0u8; Cipher::NONCE_SIZE]).expect_err("empty");
        assert!(matches!(err, CryptoError::InvalidArgument { .. }));
    }

    #[test]
    fn short_ciphertext_rejected() {
        let err = zero_cipher().decrypt(b"aaa").expect_err("too short");
        assert!(matches!(err, CryptoError::InvalidArgument { .. }));
    }

    #[test]
    fn forged_ciphertext_rejected() {
        let err = zero_cipher().decrypt(&[b'a'; 300]).expect_err("forged");
        assert_eq!(err, CryptoError::DecryptionFailed);
    }

    #[test]
    fn tampered_ciphertext_rejected() {
        let cipher = zero_cipher();
        let mut ciphertext = cipher.encrypt(b"payload", [7u8; Cipher::NONCE_SIZE]).expect("enc");
        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0x01;

        assert_eq!(cipher.decrypt(&ciphertext), Err(CryptoError::DecryptionFailed));
    }

    proptest! {
        #[test]
        fn prop_roundtrip_and_bit_flip(
            key in any::<[u8; Cipher::KEY_SIZE]>(),
            nonce in any::<[u8; Cipher::NONCE_SIZE]>(),
            plaintext in prop::collection::vec(any::<u8>(), 1..256),
            flip in any::<prop::sample::Index>(),
        ) {
            let cipher = Cipher::new(SecretKey::from_bytes(key));
            let ciphertext = cipher.encrypt(&plaintext, nonce).expect("encrypt");
            prop_assert_eq!(ciphertext.len(), Cipher::ciphertext_length(plaintext.len()));
            prop_assert_eq!(cipher.decrypt(&ciphertext).expect("decrypt"), plaintext);

            let mut tampered = ciphertext;
            let bit = flip.index(tampered.len() * 8);
            tampered[bit / 8] ^= 1 << (bit % 8);
            prop_assert_eq!(cipher.decrypt(&tampered), Err(CryptoError::DecryptionFailed));
        }
    }
}

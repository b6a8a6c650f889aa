//! Fuzz target for [`Cipher`] encryption and decryption
//!
//! Ensure malformed or tampered ciphertexts are rejected cleanly
//!
//! # Strategy
//!
//! - Roundtrip: Arbitrary keys, nonces and plaintexts
//! - Tampering: Flip one fuzzed bit of a valid ciphertext
//! - Garbage: Decrypt raw fuzzed bytes
//!
//! # Invariants
//!
//! - Decrypting a fresh ciphertext returns the plaintext
//! - Any single-bit change fails with `DecryptionFailed`
//! - Ciphertext length always equals `ciphertext_length(plaintext.len())`
//! - NEVER panic on arbitrary input

#![no_main]

use arbitrary::Arbitrary;
use arbor_crypto::{Cipher, CryptoError, SecretKey};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    key: [u8; 32],
    nonce: [u8; 24],
    plaintext: Vec<u8>,
    flip_bit: u16,
    garbage: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let cipher = Cipher::new(SecretKey::from_bytes(input.key));

    let _ = cipher.decrypt(&input.garbage);

    let Ok(ciphertext) = cipher.encrypt(&input.plaintext, input.nonce) else {
        assert!(input.plaintext.is_empty());
        return;
    };
    assert_eq!(ciphertext.len(), Cipher::ciphertext_length(input.plaintext.len()));
    assert_eq!(cipher.decrypt(&ciphertext).ok(), Some(input.plaintext.clone()));

    let mut tampered = ciphertext;
    let bit = usize::from(input.flip_bit) % (tampered.len() * 8);
    tampered[bit / 8] ^= 1 << (bit % 8);
    assert_eq!(cipher.decrypt(&tampered), Err(CryptoError::DecryptionFailed));
});

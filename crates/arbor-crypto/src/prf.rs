//! HMAC-SHA-512 pseudorandom function.

use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::{error::CryptoError, key::SecretKey};

type HmacSha512 = Hmac<Sha512>;

/// Keyed PRF producing `N` bytes per input, with a `K`-byte key.
///
/// Output is the HMAC-SHA-512 tag truncated to `N` bytes, so `N` must be in
/// `1..=64`.
#[derive(Debug)]
pub struct Prf<const N: usize, const K: usize = 32> {
    key: SecretKey<K>,
}

impl<const N: usize, const K: usize> Prf<N, K> {
    /// Output size in bytes.
    pub const OUTPUT_SIZE: usize = N;

    /// Wraps `key`.
    pub fn new(key: SecretKey<K>) -> Result<Self, CryptoError> {
        if N == 0 || N > 64 {
            return Err(CryptoError::InvalidArgument {
                reason: format!("PRF output size must be in 1..=64, got {N}"),
            });
        }
        Ok(Self { key })
    }

    /// Evaluates the PRF on `input`.
    pub fn prf(&self, input: &[u8]) -> Result<[u8; N], CryptoError> {
        let tag = self.key.with_unlocked(|key| {
            let mut mac = <HmacSha512 as Mac>::new_from_slice(key).map_err(|_| {
                CryptoError::InvalidArgument { reason: "HMAC rejected key".to_string() }
            })?;
            mac.update(input);
            Ok::<_, CryptoError>(mac.finalize().into_bytes())
        })?;

        let mut out = [0u8; N];
        out.copy_from_slice(&tag[..N]);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    // RFC 4231, test case 1.
    #[test]
    fn rfc4231_case_1() {
        let prf = Prf::<64, 20>::new(SecretKey::from_bytes([0x0b; 20])).expect("valid size");
        let expected = hex!(
            "87aa7cdea5ef619d4ff0b4241a1d6cb02379f4e2ce4ec2787ad0b30545e17cde"
            "daa833b7d6b8a702038b274eaea3f4e4be9d914eeb61f1702e696c203a126854"
        );
        assert_eq!(prf.prf(b"Hi There").expect("prf"), expected);
    }

    // RFC 4231, test case 2.
    #[test]
    fn rfc4231_case_2() {
        let prf = Prf::<64, 4>::new(SecretKey::from_bytes(*b"Jefe")).expect("valid size");
        let expected = hex!(
            "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554"
            "9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
        );
        assert_eq!(prf.prf(b"what do ya want for nothing?").expect("prf"), expected);
    }

    #[test]
    fn truncated_output_is_prefix() {
        let long = Prf::<64>::new(SecretKey::from_bytes([9u8; 32])).expect("valid size");
        let short = Prf::<16>::new(SecretKey::from_bytes([9u8; 32])).expect("valid size");

        let full = long.prf(b"input").expect("prf");
        assert_eq!(short.prf(b"input").expect("prf"), full[..16]);
    }

    #[test]
    fn invalid_output_sizes_rejected() {
        assert!(Prf::<0>::new(SecretKey::from_bytes([0u8; 32])).is_err());
        assert!(Prf::<65>::new(SecretKey::from_bytes([0u8; 32])).is_err());
    }
}

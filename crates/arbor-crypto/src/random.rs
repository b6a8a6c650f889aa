//! OS-backed randomness.

use crate::error::CryptoError;

/// Fills `buf` with bytes from the operating system's CSPRNG.
pub fn random_bytes(buf: &mut [u8]) -> Result<(), CryptoError> {
    getrandom::fill(buf)?;
    Ok(())
}

/// Returns `N` fresh random bytes.
pub fn random_array<const N: usize>() -> Result<[u8; N], CryptoError> {
    let mut out = [0u8; N];
    random_bytes(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_draws_differ() {
        let a: [u8; 32] = random_array().expect("entropy");
        let b: [u8; 32] = random_array().expect("entropy");
        assert_ne!(a, b);
    }

    #[test]
    fn empty_buffer_is_fine() {
        let mut buf = [];
        assert!(random_bytes(&mut buf).is_ok());
    }
}

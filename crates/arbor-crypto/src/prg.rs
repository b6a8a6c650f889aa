//! Domain-separated pseudorandom generator.
//!
//! The PRG treats its 32-byte key as an HKDF-SHA256 pseudorandom key and
//! expands it with HKDF-Expand, using the domain tag as the `info` input.
//! Distinct tags give independent outputs, so "derive left child", "derive
//! right child" and "derive leaf output" can never collide.

use hkdf::Hkdf;
use sha2::Sha256;

use crate::{error::CryptoError, key::SecretKey};

/// PRG key size in bytes.
pub const PRG_KEY_SIZE: usize = 32;

/// Maximum number of bytes a single `expand` call can produce.
pub const PRG_MAX_OUTPUT: usize = 255 * 32;

/// Domain separation labels for PRG expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainTag {
    /// Derive the key of the left child of a tree node.
    DeriveLeft,
    /// Derive the key of the right child of a tree node.
    DeriveRight,
    /// Derive the final output bytes at a leaf.
    LeafOutput,
}

impl DomainTag {
    /// HKDF `info` label for this tag.
    pub const fn label(self) -> &'static [u8] {
        match self {
            Self::DeriveLeft => b"arbor prg v1 derive left",
            Self::DeriveRight => b"arbor prg v1 derive right",
            Self::LeafOutput => b"arbor prg v1 leaf output",
        }
    }
}

/// Which child of a binary tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Child covering the lower half of the parent's leaves.
    Left,
    /// Child covering the upper half of the parent's leaves.
    Right,
}

impl Side {
    /// Selects the side from a path bit (`0` is left).
    pub const fn from_bit(bit: u64) -> Self {
        if bit & 1 == 0 { Self::Left } else { Self::Right }
    }

    /// Domain tag used to derive this child.
    pub const fn tag(self) -> DomainTag {
        match self {
            Self::Left => DomainTag::DeriveLeft,
            Self::Right => DomainTag::DeriveRight,
        }
    }
}

/// Deterministic, tag-separated expansion of a secret seed.
#[derive(Debug)]
pub struct Prg {
    key: SecretKey<PRG_KEY_SIZE>,
}

impl Prg {
    /// Wraps `key`. The PRG becomes its sole owner.
    pub fn new(key: SecretKey<PRG_KEY_SIZE>) -> Self {
        Self { key }
    }

    /// Fills `out` with the expansion of the key under `tag`.
    pub fn expand(&self, tag: DomainTag, out: &mut [u8]) -> Result<(), CryptoError> {
        let requested = out.len();
        if requested > PRG_MAX_OUTPUT {
            return Err(CryptoError::OutputTooLong { requested, max: PRG_MAX_OUTPUT });
        }

        self.key.with_unlocked(|prk| {
            let hk = Hkdf::<Sha256>::from_prk(prk).map_err(|_| CryptoError::InvalidArgument {
                reason: "PRG key shorter than the SHA-256 output".to_string(),
            })?;
            hk.expand(tag.label(), out)
                .map_err(|_| CryptoError::OutputTooLong { requested, max: PRG_MAX_OUTPUT })
        })
    }

    /// Expands directly into a new secret key.
    pub fn derive_key<const M: usize>(&self, tag: DomainTag) -> Result<SecretKey<M>, CryptoError> {
        SecretKey::from_fn(|buf| self.expand(tag, buf))
    }

    /// Derives the key of one child node.
    pub fn derive_child(&self, side: Side) -> Result<SecretKey<PRG_KEY_SIZE>, CryptoError> {
        self.derive_key(side.tag())
    }

    /// Derives both children and erases this PRG's key.
    pub fn split(self) -> Result<(SecretKey<PRG_KEY_SIZE>, SecretKey<PRG_KEY_SIZE>), CryptoError> {
        let left = self.derive_child(Side::Left)?;
        let right = self.derive_child(Side::Right)?;
        Ok((left, right))
    }

    /// Derives `M` bytes of leaf output.
    pub fn output<const M: usize>(&self) -> Result<[u8; M], CryptoError> {
        let mut out = [0u8; M];
        self.expand(DomainTag::LeafOutput, &mut out)?;
        Ok(out)
    }

    /// Derives the leaf output and erases this PRG's key.
    pub fn into_output<const M: usize>(self) -> Result<[u8; M], CryptoError> {
        self.output()
    }

    /// Returns an independently owned PRG over a copy of the same key.
    pub fn duplicate(&self) -> Self {
        Self { key: self.key.duplicate() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_prg() -> Prg {
        Prg::new(SecretKey::from_bytes([0u8; PRG_KEY_SIZE]))
    }

    fn bytes_of(key: &SecretKey<PRG_KEY_SIZE>) -> [u8; PRG_KEY_SIZE] {
        key.with_unlocked(|b| *b)
    }

    #[test]
    fn tags_are_separated() {
        let prg = zero_prg();
        let mut left = [0u8; 32];
        let mut right = [0u8; 32];
        let mut leaf = [0u8; 32];

        prg.expand(DomainTag::DeriveLeft, &mut left).expect("expand");
        prg.expand(DomainTag::DeriveRight, &mut right).expect("expand");
        prg.expand(DomainTag::LeafOutput, &mut leaf).expect("expand");

        assert_ne!(left, right);
        assert_ne!(left, leaf);
        assert_ne!(right, leaf);
    }

    #[test]
    fn expansion_is_deterministic() {
        let a: [u8; 16] = zero_prg().into_output().expect("output");
        let b: [u8; 16] = zero_prg().into_output().expect("output");
        assert_eq!(a, b);
    }

    #[test]
    fn shorter_output_is_prefix() {
        let prg = zero_prg();
        let mut short = [0u8; 16];
        let mut long = [0u8; 64];
        prg.expand(DomainTag::LeafOutput, &mut short).expect("expand");
        prg.expand(DomainTag::LeafOutput, &mut long).expect("expand");

        assert_eq!(short, long[..16]);
    }

    #[test]
    fn split_matches_derive_child() {
        let prg = zero_prg();
        let left = bytes_of(&prg.derive_child(Side::Left).expect("left"));
        let right = bytes_of(&prg.derive_child(Side::Right).expect("right"));

        let (l, r) = zero_prg().split().expect("split");
        assert_eq!(bytes_of(&l), left);
        assert_eq!(bytes_of(&r), right);
    }

    #[test]
    fn duplicate_expands_identically() {
        let prg = zero_prg();
        let copy = prg.duplicate();
        let a: [u8; 32] = prg.into_output().expect("output");
        let b: [u8; 32] = copy.output().expect("output");
        assert_eq!(a, b);
    }

    #[test]
    fn oversized_request_rejected() {
        let mut out = vec![0u8; PRG_MAX_OUTPUT + 1];
        let err = zero_prg().expand(DomainTag::LeafOutput, &mut out).expect_err("too long");
        assert!(matches!(err, CryptoError::OutputTooLong { .. }));
    }

    #[test]
    fn side_from_bit() {
        assert_eq!(Side::from_bit(0), Side::Left);
        assert_eq!(Side::from_bit(1), Side::Right);
        assert_eq!(Side::from_bit(0b110), Side::Left);
    }
}

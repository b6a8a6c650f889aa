//! Primitive error types.

use thiserror::Error;

/// Errors from the cryptographic primitives.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Caller supplied a structurally invalid argument.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Description of what was wrong with the argument.
        reason: String,
    },

    /// More output was requested than the PRG can produce from one key.
    #[error("PRG output too long: requested {requested} bytes, maximum is {max}")]
    OutputTooLong {
        /// Requested output length in bytes.
        requested: usize,
        /// Maximum output length in bytes.
        max: usize,
    },

    /// Ciphertext failed authentication.
    #[error("decryption failed: ciphertext is not authentic")]
    DecryptionFailed,

    /// The OS entropy source could not be read.
    #[error("entropy source unavailable: {reason}")]
    Entropy {
        /// Description of the entropy failure.
        reason: String,
    },
}

impl CryptoError {
    /// Returns true if the error was caused by caller input rather than the
    /// environment.
    pub fn is_caller_error(&self) -> bool {
        match self {
            Self::InvalidArgument { .. } | Self::OutputTooLong { .. } | Self::DecryptionFailed => {
                true
            },
            Self::Entropy { .. } => false,
        }
    }
}

impl From<getrandom::Error> for CryptoError {
    fn from(err: getrandom::Error) -> Self {
        Self::Entropy { reason: err.to_string() }
    }
}

//! RC-PRF error types.

use arbor_crypto::CryptoError;
use thiserror::Error;

/// Errors from RC-PRF construction, evaluation and constraining.
///
/// Every variant is a deterministic function of the caller's arguments.
/// Validation happens before any key derivation, so an error never implies
/// that partial derivation took place.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RcPrfError {
    /// The request is structurally nonsensical regardless of tree state.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the invalid argument.
        reason: String,
    },

    /// The request is well formed but outside what this object covers.
    #[error("out of range: {reason}")]
    OutOfRange {
        /// Description of the violated bound.
        reason: String,
    },

    /// An underlying primitive failed.
    #[error("primitive failure: {0}")]
    Crypto(#[from] CryptoError),
}

/// Coarse classification of [`RcPrfError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`RcPrfError::InvalidArgument`].
    InvalidArgument,
    /// See [`RcPrfError::OutOfRange`].
    OutOfRange,
    /// See [`RcPrfError::Crypto`].
    Crypto,
}

impl RcPrfError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument { reason: reason.into() }
    }

    pub(crate) fn out_of_range(reason: impl Into<String>) -> Self {
        Self::OutOfRange { reason: reason.into() }
    }

    /// Returns the error's kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::Crypto(_) => ErrorKind::Crypto,
        }
    }
}

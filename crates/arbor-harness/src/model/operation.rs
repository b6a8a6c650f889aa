//! Operations for model-based testing.
//!
//! Operations represent every call a holder of RC-PRF capabilities can make.
//! They are generated randomly by proptest (or a fuzzer) and applied to both
//! the model and the real implementation.

use arbitrary::Arbitrary;

/// Capability handle (0 is the root; constrain appends new handles).
pub type HandleId = u8;

/// Leaf index as generated; kept small so trees stay exhaustively checkable.
pub type ModelLeaf = u16;

/// Output length used by every world.
pub const OUTPUT_LEN: usize = 16;

/// Operations that can be applied to a world.
#[derive(Debug, Clone, Arbitrary)]
pub enum Operation {
    /// Evaluate one leaf through a handle.
    Eval {
        /// Handle to evaluate with.
        handle: HandleId,
        /// Leaf to evaluate.
        leaf: ModelLeaf,
    },

    /// Evaluate a run of leaves through a handle.
    EvalRange {
        /// Handle to evaluate with.
        handle: HandleId,
        /// First leaf.
        min: ModelLeaf,
        /// Last leaf.
        max: ModelLeaf,
    },

    /// Derive a new handle restricted to `[min, max]`.
    ///
    /// On success the new handle gets the next free id.
    Constrain {
        /// Handle to constrain.
        handle: HandleId,
        /// First leaf of the new handle.
        min: ModelLeaf,
        /// Last leaf of the new handle.
        max: ModelLeaf,
    },

    /// Drop a handle; later operations on it fail.
    Drop {
        /// Handle to drop.
        handle: HandleId,
    },
}

impl Operation {
    /// Handle the operation targets.
    pub fn handle(&self) -> HandleId {
        match self {
            Self::Eval { handle, .. }
            | Self::EvalRange { handle, .. }
            | Self::Constrain { handle, .. }
            | Self::Drop { handle } => *handle,
        }
    }
}

/// Result of applying an operation.
///
/// Used to compare model and real system behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    /// Operation succeeded without output (constrain, drop).
    Ok,

    /// Evaluation succeeded, one output per leaf in index order.
    Outputs(Vec<[u8; OUTPUT_LEN]>),

    /// Operation failed with expected error.
    Error(OperationError),
}

/// Expected errors that can occur during operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationError {
    /// Malformed request, e.g. `min > max`.
    InvalidArgument,

    /// Request outside the handle's range, or the whole tree.
    OutOfRange,

    /// Handle was never issued or has been dropped.
    InvalidHandle,

    /// A primitive failed while deriving an output.
    Crypto,
}

impl OperationResult {
    /// Check if operation succeeded.
    pub fn is_ok(&self) -> bool {
        !self.is_err()
    }

    /// Check if operation failed.
    pub fn is_err(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

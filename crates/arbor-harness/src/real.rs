//! Real system wrapper that mirrors `ModelWorld`'s interface.

use arbor_crypto::{PRG_KEY_SIZE, SecretKey};
use arbor_rcprf::{ConstrainedRcPrf, Depth, ErrorKind, RcPrf, RcPrfError};

use crate::model::{HandleId, OUTPUT_LEN, Operation, OperationError, OperationResult};

/// A live capability of the real implementation.
#[derive(Debug)]
pub enum RealHandle {
    /// Root of the tree.
    Root(RcPrf<OUTPUT_LEN>),
    /// Constrained capability.
    Constrained(ConstrainedRcPrf<OUTPUT_LEN>),
}

impl RealHandle {
    fn eval(&self, leaf: u64) -> Result<[u8; OUTPUT_LEN], RcPrfError> {
        match self {
            Self::Root(prf) => prf.eval(leaf),
            Self::Constrained(prf) => prf.eval(leaf),
        }
    }

    fn eval_range(&self, min: u64, max: u64) -> Result<Vec<[u8; OUTPUT_LEN]>, RcPrfError> {
        match self {
            Self::Root(prf) => prf.eval_range(min, max),
            Self::Constrained(prf) => prf.eval_range(min, max),
        }
    }

    fn constrain(&self, min: u64, max: u64) -> Result<ConstrainedRcPrf<OUTPUT_LEN>, RcPrfError> {
        match self {
            Self::Root(prf) => prf.constrain(min, max),
            Self::Constrained(prf) => prf.constrain(min, max),
        }
    }
}

/// Real world: the same handle bookkeeping as the model, backed by
/// `arbor-rcprf`.
#[derive(Debug)]
pub struct RealWorld {
    handles: Vec<Option<RealHandle>>,
}

impl RealWorld {
    /// Create a world holding only the root handle.
    pub fn new(root_key: [u8; PRG_KEY_SIZE], depth: Depth) -> Result<Self, RcPrfError> {
        let root = RcPrf::new(SecretKey::from_bytes(root_key), depth)?;
        Ok(Self { handles: vec![Some(RealHandle::Root(root))] })
    }

    /// Get a live handle.
    pub fn handle(&self, id: HandleId) -> Option<&RealHandle> {
        self.handles.get(usize::from(id)).and_then(Option::as_ref)
    }

    /// Apply an operation and return the result.
    pub fn apply(&mut self, op: &Operation) -> OperationResult {
        let Some(handle) = self.handle(op.handle()) else {
            return OperationResult::Error(OperationError::InvalidHandle);
        };

        let outcome = match *op {
            Operation::Eval { leaf, .. } => {
                handle.eval(u64::from(leaf)).map(|output| OperationResult::Outputs(vec![output]))
            },
            Operation::EvalRange { min, max, .. } => {
                handle.eval_range(u64::from(min), u64::from(max)).map(OperationResult::Outputs)
            },
            Operation::Constrain { min, max, .. } => {
                match handle.constrain(u64::from(min), u64::from(max)) {
                    Ok(constrained) => {
                        self.handles.push(Some(RealHandle::Constrained(constrained)));
                        Ok(OperationResult::Ok)
                    },
                    Err(err) => Err(err),
                }
            },
            Operation::Drop { handle } => {
                if let Some(slot) = self.handles.get_mut(usize::from(handle)) {
                    *slot = None;
                }
                Ok(OperationResult::Ok)
            },
        };

        outcome.unwrap_or_else(|err| OperationResult::Error(classify(&err)))
    }
}

fn classify(err: &RcPrfError) -> OperationError {
    match err.kind() {
        ErrorKind::InvalidArgument => OperationError::InvalidArgument,
        ErrorKind::OutOfRange => OperationError::OutOfRange,
        ErrorKind::Crypto => OperationError::Crypto,
    }
}

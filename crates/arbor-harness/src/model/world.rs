//! Model world - the reference implementation.
//!
//! Tracks which interval each handle may evaluate and recomputes every
//! output from the root key by walking the tree one leaf at a time. It
//! never decomposes ranges, so it shares no code path with the real
//! constrain logic.

use arbor_crypto::{CryptoError, PRG_KEY_SIZE, Prg, SecretKey, Side};
use arbor_rcprf::{Depth, RcPrfParams};

use super::operation::{
    HandleId, ModelLeaf, OUTPUT_LEN, Operation, OperationError, OperationResult,
};

/// What a live handle may evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelHandle {
    /// The root: every leaf of the tree.
    Root,
    /// A constrained capability over `[min, max]`.
    Range {
        /// First authorized leaf.
        min: u64,
        /// Last authorized leaf.
        max: u64,
    },
}

/// Model world.
#[derive(Debug, Clone)]
pub struct ModelWorld {
    root_key: [u8; PRG_KEY_SIZE],
    depth: Depth,
    /// Handles indexed by `HandleId`; `None` once dropped.
    handles: Vec<Option<ModelHandle>>,
}

impl ModelWorld {
    /// Create a world holding only the root handle.
    pub fn new(root_key: [u8; PRG_KEY_SIZE], depth: Depth) -> Self {
        Self { root_key, depth, handles: vec![Some(ModelHandle::Root)] }
    }

    /// Depth of the tree.
    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// Index of the last leaf.
    pub fn max_leaf(&self) -> u64 {
        RcPrfParams::max_leaf_index(self.depth)
    }

    /// Number of handles ever issued, dropped ones included.
    pub fn num_handles(&self) -> usize {
        self.handles.len()
    }

    /// Get a live handle.
    pub fn handle(&self, id: HandleId) -> Option<ModelHandle> {
        self.handles.get(usize::from(id)).copied().flatten()
    }

    /// Interval a handle may evaluate.
    pub fn bounds(&self, handle: ModelHandle) -> (u64, u64) {
        match handle {
            ModelHandle::Root => (0, self.max_leaf()),
            ModelHandle::Range { min, max } => (min, max),
        }
    }

    /// Apply an operation and return the result.
    ///
    /// The result should match the real implementation's result.
    pub fn apply(&mut self, op: &Operation) -> OperationResult {
        let Some(handle) = self.handle(op.handle()) else {
            return OperationResult::Error(OperationError::InvalidHandle);
        };

        let outcome = match *op {
            Operation::Eval { leaf, .. } => self.apply_eval(handle, leaf),
            Operation::EvalRange { min, max, .. } => self.apply_eval_range(handle, min, max),
            Operation::Constrain { min, max, .. } => self.apply_constrain(handle, min, max),
            Operation::Drop { handle } => {
                if let Some(slot) = self.handles.get_mut(usize::from(handle)) {
                    *slot = None;
                }
                Ok(OperationResult::Ok)
            },
        };
        outcome.unwrap_or_else(OperationResult::Error)
    }

    fn apply_eval(
        &self,
        handle: ModelHandle,
        leaf: ModelLeaf,
    ) -> Result<OperationResult, OperationError> {
        let leaf = u64::from(leaf);
        let (min, max) = self.bounds(handle);
        if leaf < min || leaf > max {
            return Err(OperationError::OutOfRange);
        }
        let output = self.leaf_output(leaf).map_err(|_| OperationError::Crypto)?;
        Ok(OperationResult::Outputs(vec![output]))
    }

    fn apply_eval_range(
        &self,
        handle: ModelHandle,
        min: ModelLeaf,
        max: ModelLeaf,
    ) -> Result<OperationResult, OperationError> {
        let (min, max) = (u64::from(min), u64::from(max));
        if min > max {
            return Err(OperationError::InvalidArgument);
        }
        let (lo, hi) = self.bounds(handle);
        if min < lo || max > hi {
            return Err(OperationError::OutOfRange);
        }
        let outputs = (min..=max)
            .map(|leaf| self.leaf_output(leaf))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| OperationError::Crypto)?;
        Ok(OperationResult::Outputs(outputs))
    }

    fn apply_constrain(
        &mut self,
        handle: ModelHandle,
        min: ModelLeaf,
        max: ModelLeaf,
    ) -> Result<OperationResult, OperationError> {
        let (min, max) = (u64::from(min), u64::from(max));
        if min > max {
            return Err(OperationError::InvalidArgument);
        }
        let (lo, hi) = self.bounds(handle);
        if min < lo || max > hi {
            return Err(OperationError::OutOfRange);
        }
        if handle == ModelHandle::Root && min == 0 && max == self.max_leaf() {
            return Err(OperationError::OutOfRange);
        }

        self.handles.push(Some(ModelHandle::Range { min, max }));
        Ok(OperationResult::Ok)
    }

    /// Output of `leaf`, derived from the root one level at a time.
    pub fn leaf_output(&self, leaf: u64) -> Result<[u8; OUTPUT_LEN], CryptoError> {
        let mut node = Prg::new(SecretKey::from_bytes(self.root_key));
        for level in (0..self.depth).rev() {
            node = Prg::new(node.derive_child(Side::from_bit(leaf >> level))?);
        }
        node.into_output()
    }
}

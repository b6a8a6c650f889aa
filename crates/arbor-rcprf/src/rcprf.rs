//! Root of the tree.

use arbor_crypto::{PRG_KEY_SIZE, PRG_MAX_OUTPUT, Prg, SecretKey};

use crate::{
    constrained::{ConstrainedRcPrf, MAX_PREALLOCATED_OUTPUTS, range_len},
    error::RcPrfError,
    params::{Depth, RcPrfParams, Subtree},
    tree,
};

/// Size in bytes of a root (and of every node) key.
pub const RCPRF_KEY_SIZE: usize = PRG_KEY_SIZE;

/// Range-constrained PRF over a tree of depth `depth`, producing `N` bytes
/// per leaf.
///
/// Holds the root key and can evaluate every leaf in
/// `[0, max_leaf_index(depth)]`.
#[derive(Debug)]
pub struct RcPrf<const N: usize> {
    root: Prg,
    depth: Depth,
}

impl<const N: usize> RcPrf<N> {
    /// Takes ownership of `key` as the root of a tree of depth `depth`.
    ///
    /// Fails with `InvalidArgument` if `depth` is not in
    /// `1..=RcPrfParams::MAX_HEIGHT` or if `N` is zero or larger than one
    /// PRG expansion. The key is wiped on failure.
    pub fn new(key: SecretKey<RCPRF_KEY_SIZE>, depth: Depth) -> Result<Self, RcPrfError> {
        if !RcPrfParams::is_valid_depth(depth) {
            return Err(RcPrfError::invalid(format!(
                "depth must be in 1..={}, got {depth}",
                RcPrfParams::MAX_HEIGHT
            )));
        }
        if N == 0 || N > PRG_MAX_OUTPUT {
            return Err(RcPrfError::invalid(format!(
                "output length must be in 1..={PRG_MAX_OUTPUT}, got {N}"
            )));
        }

        tracing::debug!(depth, output_len = N, "rcprf created");
        Ok(Self { root: Prg::new(key), depth })
    }

    /// Creates a tree under a fresh random root key.
    pub fn random(depth: Depth) -> Result<Self, RcPrfError> {
        Self::new(SecretKey::random()?, depth)
    }

    /// Depth of the tree.
    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// Index of the last leaf.
    pub fn max_leaf(&self) -> u64 {
        RcPrfParams::max_leaf_index(self.depth)
    }

    fn root_subtree(&self) -> Subtree {
        Subtree::new(0, self.depth)
    }

    /// Evaluates `leaf`, walking from the root along the bits of `leaf`,
    /// most significant first.
    pub fn eval(&self, leaf: u64) -> Result<[u8; N], RcPrfError> {
        if leaf > self.max_leaf() {
            return Err(RcPrfError::out_of_range(format!(
                "leaf {leaf} exceeds maximum index {}",
                self.max_leaf()
            )));
        }
        tree::eval_leaf(&self.root, self.depth, leaf)
    }

    /// Evaluates every leaf of `[min, max]`, in order.
    ///
    /// Shares the upper levels of the walk between neighbouring leaves, so
    /// it is cheaper than calling [`RcPrf::eval`] in a loop. Ranges wider
    /// than [`RcPrfParams::MAX_BATCH_LEAVES`] fail with `OutOfRange`.
    pub fn eval_range(&self, min: u64, max: u64) -> Result<Vec<[u8; N]>, RcPrfError> {
        if min > max {
            return Err(RcPrfError::invalid(format!("empty range [{min}, {max}]")));
        }
        if max > self.max_leaf() {
            return Err(RcPrfError::out_of_range(format!(
                "leaf {max} exceeds maximum index {}",
                self.max_leaf()
            )));
        }
        let count = range_len(min, max)?;

        let mut out = Vec::with_capacity(count.min(MAX_PREALLOCATED_OUTPUTS));
        tree::eval_range(&self.root, self.root_subtree(), min, max, &mut out)?;
        Ok(out)
    }

    /// Derives a capability that evaluates exactly the leaves of
    /// `[min, max]`.
    ///
    /// Fails with `InvalidArgument` if `min > max`, and with `OutOfRange` if
    /// `max` is past the last leaf or if the request is the whole tree.
    pub fn constrain(&self, min: u64, max: u64) -> Result<ConstrainedRcPrf<N>, RcPrfError> {
        if min > max {
            return Err(RcPrfError::invalid(format!("empty range [{min}, {max}]")));
        }
        if max > self.max_leaf() {
            return Err(RcPrfError::out_of_range(format!(
                "leaf {max} exceeds maximum index {}",
                self.max_leaf()
            )));
        }
        if min == 0 && max == self.max_leaf() {
            return Err(RcPrfError::out_of_range(
                "constraining to the whole tree would hand out the root key",
            ));
        }

        let mut elements = Vec::new();
        tree::decompose(&self.root, self.root_subtree(), self.depth, min, max, &mut elements)?;

        tracing::debug!(depth = self.depth, min, max, elements = elements.len(), "constrained");

        ConstrainedRcPrf::new(elements)
    }
}

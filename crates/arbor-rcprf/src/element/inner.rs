//! Aligned-subtree capability.

use std::marker::PhantomData;

use arbor_crypto::{PRG_KEY_SIZE, Prg, SecretKey};

use crate::{
    element::ConstrainedElement,
    error::RcPrfError,
    params::{Depth, RcPrfParams, Subtree},
    tree,
};

/// Capability over every leaf of one aligned subtree.
///
/// Holds the key of the subtree's root node. The covered range `[min, max]`
/// always spans exactly `2^subtree_height` leaves starting at a multiple of
/// `2^subtree_height`, and `1 < subtree_height < tree_height`.
#[derive(Debug)]
pub struct InnerElement<const N: usize> {
    prg: Prg,
    tree_height: Depth,
    subtree_height: Depth,
    min: u64,
    max: u64,
    _output: PhantomData<[u8; N]>,
}

impl<const N: usize> InnerElement<N> {
    /// Takes ownership of the subtree root `key`.
    ///
    /// The key is wiped if validation fails.
    pub fn new(
        key: SecretKey<PRG_KEY_SIZE>,
        tree_height: Depth,
        subtree_height: Depth,
        min: u64,
        max: u64,
    ) -> Result<Self, RcPrfError> {
        Self::from_prg(Prg::new(key), tree_height, subtree_height, min, max)
    }

    /// Same as [`InnerElement::new`] for a key already wrapped in a PRG.
    pub fn from_prg(
        prg: Prg,
        tree_height: Depth,
        subtree_height: Depth,
        min: u64,
        max: u64,
    ) -> Result<Self, RcPrfError> {
        if min > max {
            return Err(RcPrfError::invalid(format!("empty range [{min}, {max}]")));
        }
        if subtree_height <= 1 {
            return Err(RcPrfError::invalid(format!(
                "subtree height must be at least 2, got {subtree_height}"
            )));
        }
        if subtree_height >= tree_height {
            return Err(RcPrfError::invalid(format!(
                "subtree height {subtree_height} must be below tree height {tree_height}"
            )));
        }
        if tree_height > RcPrfParams::MAX_HEIGHT {
            return Err(RcPrfError::invalid(format!("invalid tree height {tree_height}")));
        }
        if !RcPrfParams::is_aligned_subtree(min, max, subtree_height) {
            return Err(RcPrfError::invalid(format!(
                "[{min}, {max}] is not an aligned subtree of height {subtree_height}"
            )));
        }
        if max > RcPrfParams::max_leaf_index(tree_height) {
            return Err(RcPrfError::invalid(format!(
                "[{min}, {max}] does not fit a tree of height {tree_height}"
            )));
        }

        Ok(Self { prg, tree_height, subtree_height, min, max, _output: PhantomData })
    }

    /// First covered leaf.
    pub fn min(&self) -> u64 {
        self.min
    }

    /// Last covered leaf.
    pub fn max(&self) -> u64 {
        self.max
    }

    /// Height of the whole tree.
    pub fn tree_height(&self) -> Depth {
        self.tree_height
    }

    /// Number of levels between this node and the leaves.
    pub fn subtree_height(&self) -> Depth {
        self.subtree_height
    }

    fn subtree(&self) -> Subtree {
        Subtree::new(self.min, self.subtree_height)
    }

    fn check_covers(&self, min: u64, max: u64) -> Result<(), RcPrfError> {
        if min < self.min || max > self.max {
            return Err(RcPrfError::out_of_range(format!(
                "[{min}, {max}] is not within [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Evaluates a covered leaf by walking down from the subtree root.
    pub fn eval(&self, leaf: u64) -> Result<[u8; N], RcPrfError> {
        self.check_covers(leaf, leaf)?;
        tree::eval_leaf(&self.prg, self.subtree_height, leaf - self.min)
    }

    /// Evaluates every leaf of `[min, max]`, in order.
    pub fn eval_range(
        &self,
        min: u64,
        max: u64,
        out: &mut Vec<[u8; N]>,
    ) -> Result<(), RcPrfError> {
        self.check_covers(min, max)?;
        tree::eval_range(&self.prg, self.subtree(), min, max, out)
    }

    /// Appends the canonical decomposition of `[min, max]` to `out`.
    pub fn generate_constrained_subkeys(
        &self,
        min: u64,
        max: u64,
        out: &mut Vec<ConstrainedElement<N>>,
    ) -> Result<(), RcPrfError> {
        if min > max {
            return Err(RcPrfError::invalid(format!("empty range [{min}, {max}]")));
        }
        self.check_covers(min, max)?;
        tree::decompose(&self.prg, self.subtree(), self.tree_height, min, max, out)
    }
}

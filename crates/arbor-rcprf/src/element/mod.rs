//! Constrained elements.
//!
//! A constrained capability is a sequence of elements, each covering one
//! maximal aligned block of the delegated range. The set of element kinds is
//! closed, so they form a sum type rather than a trait object.

mod inner;
mod leaf;

pub use inner::InnerElement;
pub use leaf::LeafElement;

use crate::{error::RcPrfError, params::Depth};

/// One block of a constrained capability.
#[derive(Debug)]
pub enum ConstrainedElement<const N: usize> {
    /// A single leaf, stored as its output.
    Leaf(LeafElement<N>),
    /// An aligned subtree of at least four leaves, stored as its root key.
    Inner(InnerElement<N>),
}

impl<const N: usize> ConstrainedElement<N> {
    /// First covered leaf.
    pub fn min(&self) -> u64 {
        match self {
            Self::Leaf(leaf) => leaf.index(),
            Self::Inner(inner) => inner.min(),
        }
    }

    /// Last covered leaf.
    pub fn max(&self) -> u64 {
        match self {
            Self::Leaf(leaf) => leaf.index(),
            Self::Inner(inner) => inner.max(),
        }
    }

    /// Height of the whole tree this element was carved from.
    pub fn tree_height(&self) -> Depth {
        match self {
            Self::Leaf(leaf) => leaf.tree_height(),
            Self::Inner(inner) => inner.tree_height(),
        }
    }

    /// Returns true for single-leaf elements.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Returns true if `leaf` lies in this element's range.
    pub fn contains(&self, leaf: u64) -> bool {
        self.min() <= leaf && leaf <= self.max()
    }

    /// Evaluates a covered leaf.
    pub fn eval(&self, leaf: u64) -> Result<[u8; N], RcPrfError> {
        match self {
            Self::Leaf(element) => element.eval(leaf),
            Self::Inner(element) => element.eval(leaf),
        }
    }

    /// Evaluates every leaf of `[min, max]`, in order.
    pub fn eval_range(
        &self,
        min: u64,
        max: u64,
        out: &mut Vec<[u8; N]>,
    ) -> Result<(), RcPrfError> {
        match self {
            Self::Leaf(element) => {
                if min != max {
                    return Err(RcPrfError::out_of_range(format!(
                        "[{min}, {max}] is not the single leaf {}",
                        element.index()
                    )));
                }
                out.push(element.eval(min)?);
                Ok(())
            },
            Self::Inner(element) => element.eval_range(min, max, out),
        }
    }

    /// Appends elements covering exactly `[min, max]` to `out`.
    pub fn generate_constrained_subkeys(
        &self,
        min: u64,
        max: u64,
        out: &mut Vec<Self>,
    ) -> Result<(), RcPrfError> {
        match self {
            Self::Leaf(element) => element.generate_constrained_subkeys(min, max, out),
            Self::Inner(element) => element.generate_constrained_subkeys(min, max, out),
        }
    }
}

impl<const N: usize> From<LeafElement<N>> for ConstrainedElement<N> {
    fn from(leaf: LeafElement<N>) -> Self {
        Self::Leaf(leaf)
    }
}

impl<const N: usize> From<InnerElement<N>> for ConstrainedElement<N> {
    fn from(inner: InnerElement<N>) -> Self {
        Self::Inner(inner)
    }
}

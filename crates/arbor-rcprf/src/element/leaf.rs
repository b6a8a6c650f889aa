//! Single-leaf capability.

use arbor_crypto::SecretKey;

use crate::{
    element::ConstrainedElement,
    error::RcPrfError,
    params::{Depth, RcPrfParams},
};

/// Capability over exactly one leaf.
///
/// Holds the final output for that leaf, so evaluation is a lookup.
#[derive(Debug)]
pub struct LeafElement<const N: usize> {
    output: SecretKey<N>,
    tree_height: Depth,
    index: u64,
}

impl<const N: usize> LeafElement<N> {
    /// Wraps the output of leaf `index` in a tree of height `tree_height`.
    pub fn new(output: [u8; N], tree_height: Depth, index: u64) -> Result<Self, RcPrfError> {
        if !RcPrfParams::is_valid_depth(tree_height) {
            return Err(RcPrfError::invalid(format!("invalid tree height {tree_height}")));
        }
        if index > RcPrfParams::max_leaf_index(tree_height) {
            return Err(RcPrfError::invalid(format!(
                "leaf {index} does not exist in a tree of height {tree_height}"
            )));
        }

        Ok(Self { output: SecretKey::from_bytes(output), tree_height, index })
    }

    /// Index of the covered leaf.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Height of the whole tree.
    pub fn tree_height(&self) -> Depth {
        self.tree_height
    }

    /// Returns the stored output if `leaf` is the covered leaf.
    pub fn eval(&self, leaf: u64) -> Result<[u8; N], RcPrfError> {
        if leaf != self.index {
            return Err(RcPrfError::out_of_range(format!(
                "leaf {leaf} is not covered by the element for leaf {}",
                self.index
            )));
        }
        Ok(self.output.with_unlocked(|bytes| *bytes))
    }

    /// Re-issues this element if `[min, max]` is exactly its leaf.
    ///
    /// A single leaf cannot be split further, so any other request is out of
    /// range.
    pub fn generate_constrained_subkeys(
        &self,
        min: u64,
        max: u64,
        out: &mut Vec<ConstrainedElement<N>>,
    ) -> Result<(), RcPrfError> {
        if min != self.index || max != self.index {
            return Err(RcPrfError::out_of_range(format!(
                "[{min}, {max}] is not the single leaf {}",
                self.index
            )));
        }

        out.push(ConstrainedElement::Leaf(self.duplicate()));
        Ok(())
    }

    fn duplicate(&self) -> Self {
        Self { output: self.output.duplicate(), tree_height: self.tree_height, index: self.index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn eval_only_covers_own_index() {
        let leaf = LeafElement::new([5u8; 16], 7, 1).expect("valid leaf");

        assert_eq!(leaf.eval(1).expect("covered"), [5u8; 16]);
        assert_eq!(leaf.eval(0).expect_err("below").kind(), ErrorKind::OutOfRange);
        assert_eq!(leaf.eval(2).expect_err("above").kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn subkeys_only_for_exact_leaf() {
        let leaf = LeafElement::new([0u8; 16], 7, 1).expect("valid leaf");
        let mut out = Vec::new();

        let err = leaf.generate_constrained_subkeys(0, 1, &mut out).expect_err("wider");
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        let err = leaf.generate_constrained_subkeys(1, 2, &mut out).expect_err("wider");
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert!(out.is_empty());

        leaf.generate_constrained_subkeys(1, 1, &mut out).expect("exact");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].eval(1).expect("copy evaluates"), [0u8; 16]);
    }

    #[test]
    fn rejects_leaf_outside_tree() {
        let err = LeafElement::new([0u8; 16], 2, 4).expect_err("tree has 4 leaves");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = LeafElement::new([0u8; 16], 0, 0).expect_err("height 0");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}

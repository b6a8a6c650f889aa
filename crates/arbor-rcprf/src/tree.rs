//! GGM tree walking shared by the root and the constrained elements.
//!
//! Every node key is expanded by the PRG into its two children
//! ([`DomainTag::DeriveLeft`](arbor_crypto::DomainTag::DeriveLeft) /
//! [`DomainTag::DeriveRight`](arbor_crypto::DomainTag::DeriveRight)), and a
//! leaf key is expanded into the output bytes. Keys are wrapped in [`Prg`]
//! while in flight; each intermediate is dropped (and wiped) as soon as its
//! children exist.
//!
//! # Canonical decomposition
//!
//! A request `[lo, hi]` inside a subtree is covered by the maximal aligned
//! blocks it contains. Only the nodes on the two boundary paths are ever
//! split, so a range yields `O(h)` blocks and costs `O(h)` PRG calls.
//!
//! ```text
//!              [0,7]
//!          /           \
//!       [0,3]         [4,7]
//!       /   \         /   \
//!    [0,1] [2,3]   [4,5] [6,7]
//!
//!    request [1,6] -> {1} [2,3] [4,5] {6}
//! ```
//!
//! Blocks of height 1 are emitted as two leaves because an inner element
//! must span at least two levels.

use arbor_crypto::{Prg, Side};

use crate::{
    element::{ConstrainedElement, InnerElement, LeafElement},
    error::RcPrfError,
    params::{Depth, Subtree},
};

/// Side taken at `level` levels above the leaf on the path to `offset`.
fn path_side(offset: u64, level: Depth) -> Side {
    Side::from_bit(offset >> level)
}

/// Evaluates the leaf at local `offset` below `node`, `height` levels down.
pub(crate) fn eval_leaf<const N: usize>(
    node: &Prg,
    height: Depth,
    offset: u64,
) -> Result<[u8; N], RcPrfError> {
    let Some(top) = height.checked_sub(1) else {
        return Ok(node.output()?);
    };

    let mut current = Prg::new(node.derive_child(path_side(offset, top))?);
    for level in (0..top).rev() {
        current = Prg::new(current.derive_child(path_side(offset, level))?);
    }
    Ok(current.into_output()?)
}

/// Appends the decomposition of `[lo, hi]` within `subtree` rooted at the
/// borrowed `node`.
///
/// `[lo, hi]` must lie inside the subtree; callers validate this.
pub(crate) fn decompose<const N: usize>(
    node: &Prg,
    subtree: Subtree,
    tree_height: Depth,
    lo: u64,
    hi: u64,
    out: &mut Vec<ConstrainedElement<N>>,
) -> Result<(), RcPrfError> {
    if subtree.is_covered_by(lo, hi) {
        return emit(node.duplicate(), subtree, tree_height, out);
    }
    decompose_children(node, subtree, tree_height, lo, hi, out)
}

fn decompose_owned<const N: usize>(
    node: Prg,
    subtree: Subtree,
    tree_height: Depth,
    lo: u64,
    hi: u64,
    out: &mut Vec<ConstrainedElement<N>>,
) -> Result<(), RcPrfError> {
    if subtree.is_covered_by(lo, hi) {
        return emit(node, subtree, tree_height, out);
    }
    decompose_children(&node, subtree, tree_height, lo, hi, out)
}

fn decompose_children<const N: usize>(
    node: &Prg,
    subtree: Subtree,
    tree_height: Depth,
    lo: u64,
    hi: u64,
    out: &mut Vec<ConstrainedElement<N>>,
) -> Result<(), RcPrfError> {
    let (left, right) = subtree.children();

    if lo <= left.max() {
        let child = Prg::new(node.derive_child(Side::Left)?);
        decompose_owned(child, left, tree_height, lo, hi.min(left.max()), out)?;
    }
    if hi >= right.min {
        let child = Prg::new(node.derive_child(Side::Right)?);
        decompose_owned(child, right, tree_height, lo.max(right.min), hi, out)?;
    }
    Ok(())
}

/// Turns a fully covered block into elements.
fn emit<const N: usize>(
    node: Prg,
    subtree: Subtree,
    tree_height: Depth,
    out: &mut Vec<ConstrainedElement<N>>,
) -> Result<(), RcPrfError> {
    tracing::trace!(min = subtree.min, max = subtree.max(), height = subtree.height, "emit block");

    match subtree.height {
        0 => {
            let leaf = LeafElement::new(node.into_output()?, tree_height, subtree.min)?;
            out.push(ConstrainedElement::Leaf(leaf));
        },
        1 => {
            let (left, right) = node.split()?;
            let output = Prg::new(left).into_output()?;
            out.push(ConstrainedElement::Leaf(LeafElement::new(output, tree_height, subtree.min)?));
            let output = Prg::new(right).into_output()?;
            out.push(ConstrainedElement::Leaf(LeafElement::new(
                output,
                tree_height,
                subtree.min + 1,
            )?));
        },
        height => {
            let inner =
                InnerElement::from_prg(node, tree_height, height, subtree.min, subtree.max())?;
            out.push(ConstrainedElement::Inner(inner));
        },
    }
    Ok(())
}

/// Appends the outputs of every leaf in `[lo, hi]` below `node`, in index
/// order. Each node on the way is expanded once.
pub(crate) fn eval_range<const N: usize>(
    node: &Prg,
    subtree: Subtree,
    lo: u64,
    hi: u64,
    out: &mut Vec<[u8; N]>,
) -> Result<(), RcPrfError> {
    if subtree.height == 0 {
        out.push(node.output()?);
        return Ok(());
    }

    let (left, right) = subtree.children();
    if lo <= left.max() {
        let child = Prg::new(node.derive_child(Side::Left)?);
        eval_range(&child, left, lo, hi.min(left.max()), out)?;
    }
    if hi >= right.min {
        let child = Prg::new(node.derive_child(Side::Right)?);
        eval_range(&child, right, lo.max(right.min), hi, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use arbor_crypto::SecretKey;

    use super::*;

    fn zero_node() -> Prg {
        Prg::new(SecretKey::from_bytes([0u8; 32]))
    }

    fn ranges(elements: &[ConstrainedElement<16>]) -> Vec<(u64, u64)> {
        elements.iter().map(|e| (e.min(), e.max())).collect()
    }

    #[test]
    fn decomposition_picks_maximal_blocks() {
        let mut out = Vec::new();
        decompose::<16>(&zero_node(), Subtree::new(0, 3), 3, 1, 6, &mut out).expect("decompose");

        assert_eq!(ranges(&out), vec![(1, 1), (2, 2), (3, 3), (4, 4), (5, 5), (6, 6)]);
    }

    #[test]
    fn decomposition_keeps_large_blocks_whole() {
        let mut out = Vec::new();
        decompose::<16>(&zero_node(), Subtree::new(0, 5), 5, 3, 28, &mut out).expect("decompose");

        assert_eq!(ranges(&out), vec![(3, 3), (4, 7), (8, 15), (16, 23), (24, 27), (28, 28)]);
        assert!(out[0].is_leaf());
        assert!(!out[1].is_leaf());
    }

    #[test]
    fn height_one_blocks_become_leaves() {
        let mut out = Vec::new();
        decompose::<16>(&zero_node(), Subtree::new(0, 3), 3, 2, 3, &mut out).expect("decompose");

        assert_eq!(ranges(&out), vec![(2, 2), (3, 3)]);
        assert!(out.iter().all(ConstrainedElement::is_leaf));
    }

    #[test]
    fn range_eval_matches_point_eval() {
        let node = zero_node();
        let mut outputs: Vec<[u8; 16]> = Vec::new();
        eval_range(&node, Subtree::new(0, 4), 3, 12, &mut outputs).expect("range");

        assert_eq!(outputs.len(), 10);
        for (i, output) in outputs.iter().enumerate() {
            let leaf = 3 + i as u64;
            assert_eq!(*output, eval_leaf::<16>(&node, 4, leaf).expect("eval"));
        }
    }
}

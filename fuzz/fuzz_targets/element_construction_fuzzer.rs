//! Fuzz target for element and container construction
//!
//! Ensure hand-assembled capabilities can never claim more than they hold
//!
//! # Strategy
//!
//! - Geometry: Arbitrary tree heights, subtree heights and ranges, including
//!   misaligned, oversized and inverted ones
//! - Containers: Arbitrary element lists with gaps, overlaps and mixed heights
//!
//! # Invariants
//!
//! - An accepted inner element covers exactly `2^subtree_height` aligned
//!   leaves with `1 < subtree_height < tree_height`
//! - An accepted container is non-empty, gap-free and single-height
//! - Evaluation outside an accepted range always fails with `OutOfRange`
//! - NEVER panic on malformed geometry

#![no_main]

use arbitrary::Arbitrary;
use arbor_crypto::SecretKey;
use arbor_rcprf::{
    ConstrainedElement, ConstrainedRcPrf, ErrorKind, InnerElement, LeafElement, RcPrfParams,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
enum FuzzElement {
    Leaf { tree_height: u8, index: u64 },
    Inner { tree_height: u8, subtree_height: u8, min: u64, max: u64 },
}

#[derive(Debug, Clone, Arbitrary)]
struct FuzzInput {
    elements: Vec<FuzzElement>,
    leaf: u64,
}

fn build(element: &FuzzElement) -> Option<ConstrainedElement<16>> {
    match *element {
        FuzzElement::Leaf { tree_height, index } => {
            let result = LeafElement::new([0u8; 16], tree_height, index);
            if let Ok(leaf) = &result {
                assert!(RcPrfParams::is_valid_depth(leaf.tree_height()));
                assert!(leaf.index() <= RcPrfParams::max_leaf_index(tree_height));
            }
            result.ok().map(ConstrainedElement::from)
        },
        FuzzElement::Inner { tree_height, subtree_height, min, max } => {
            let key = SecretKey::from_bytes([0u8; 32]);
            let result = InnerElement::new(key, tree_height, subtree_height, min, max);
            match &result {
                Ok(inner) => {
                    assert!(inner.subtree_height() > 1);
                    assert!(inner.subtree_height() < inner.tree_height());
                    assert!(RcPrfParams::is_aligned_subtree(min, max, subtree_height));
                    assert!(max <= RcPrfParams::max_leaf_index(tree_height));
                    if min > 0 {
                        let err = inner.eval(min - 1).expect_err("below range");
                        assert_eq!(err.kind(), ErrorKind::OutOfRange);
                    }
                },
                Err(err) => assert_eq!(err.kind(), ErrorKind::InvalidArgument),
            }
            result.ok().map(ConstrainedElement::from)
        },
    }
}

fuzz_target!(|input: FuzzInput| {
    let elements: Vec<_> = input.elements.iter().take(32).filter_map(build).collect();
    let count = elements.len();

    match ConstrainedRcPrf::new(elements) {
        Ok(prf) => {
            assert!(count > 0);
            assert_eq!(prf.len(), count);
            let tiles = prf.elements().windows(2).all(|pair| pair[0].max() + 1 == pair[1].min());
            assert!(tiles, "accepted container with a gap or overlap");

            match prf.eval(input.leaf) {
                Ok(_) => assert!(prf.contains(input.leaf)),
                Err(err) => {
                    assert!(!prf.contains(input.leaf));
                    assert_eq!(err.kind(), ErrorKind::OutOfRange);
                },
            }
        },
        Err(err) => assert_eq!(err.kind(), ErrorKind::InvalidArgument),
    }
});

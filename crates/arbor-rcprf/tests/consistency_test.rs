//! Functional consistency of constrained capabilities.
//!
//! Every capability covering a leaf must evaluate it to the same bytes as
//! the root, however many times it was narrowed on the way.

use arbor_crypto::SecretKey;
use arbor_rcprf::{ConstrainedRcPrf, Depth, ErrorKind, RcPrf, RcPrfParams};
use proptest::prelude::*;

fn prf_from(seed: u8, depth: Depth) -> RcPrf<16> {
    RcPrf::new(SecretKey::from_bytes([seed; 32]), depth).expect("valid depth")
}

/// Every leaf output of `prf`, indexed by leaf.
fn all_outputs(prf: &RcPrf<16>) -> Vec<[u8; 16]> {
    prf.eval_range(0, prf.max_leaf()).expect("whole tree")
}

/// Checks that `capability` evaluates `[min, max]` to `expected` and rejects
/// the neighbours just outside it.
fn assert_matches_root(
    expected: &[[u8; 16]],
    capability: &ConstrainedRcPrf<16>,
    min: u64,
    max: u64,
) {
    assert_eq!((capability.min(), capability.max()), (min, max));

    for leaf in min..=max {
        assert_eq!(
            capability.eval(leaf).expect("covered leaf"),
            expected[usize::try_from(leaf).expect("small tree")],
            "leaf {leaf} of [{min}, {max}]"
        );
    }
    if min > 0 {
        assert_eq!(capability.eval(min - 1).expect_err("below").kind(), ErrorKind::OutOfRange);
    }
    if max + 1 < expected.len() as u64 {
        assert_eq!(capability.eval(max + 1).expect_err("above").kind(), ErrorKind::OutOfRange);
    }
}

#[test]
fn scenario_depth_seven_zero_key() {
    let prf = prf_from(0, 7);

    let first = prf.eval(0).expect("eval 0");
    let last = prf.eval(127).expect("eval 127");
    assert_eq!(first.len(), 16);
    assert_ne!(first, last);

    let window = prf.constrain(4, 7).expect("constrain [4, 7]");
    assert_eq!(window.eval(5).expect("eval 5"), prf.eval(5).expect("eval 5"));
    assert_eq!(window.eval(3).expect_err("outside").kind(), ErrorKind::OutOfRange);

    let narrowed = window.constrain(5, 6).expect("constrain [5, 6]");
    assert_eq!(narrowed.eval(6).expect("eval 6"), prf.eval(6).expect("eval 6"));
}

#[test]
fn every_range_at_depth_seven() {
    let prf = prf_from(0, 7);
    let expected = all_outputs(&prf);
    let max_leaf = RcPrfParams::max_leaf_index(7);

    for min in 0..=max_leaf {
        for max in min..=max_leaf {
            if min == 0 && max == max_leaf {
                continue;
            }
            let capability = prf.constrain(min, max).expect("partial range");
            assert_matches_root(&expected, &capability, min, max);
        }
    }
}

#[test]
fn every_nested_range_at_depth_five() {
    let prf = prf_from(0x5a, 5);
    let expected = all_outputs(&prf);
    let max_leaf = RcPrfParams::max_leaf_index(5);

    for min in 0..=max_leaf {
        for max in min..=max_leaf {
            if min == 0 && max == max_leaf {
                continue;
            }
            let outer = prf.constrain(min, max).expect("outer range");

            for inner_min in min..=max {
                for inner_max in inner_min..=max {
                    let inner = outer.constrain(inner_min, inner_max).expect("nested range");
                    assert_matches_root(&expected, &inner, inner_min, inner_max);
                }
            }
        }
    }
}

#[test]
fn repeated_narrowing_converges_to_a_leaf() {
    let prf = prf_from(3, 12);
    let target: u64 = 2_719;

    let mut capability = prf.constrain(1, 4_094).expect("initial range");
    let (mut min, mut max): (u64, u64) = (1, 4_094);
    while min < max {
        min += (target - min).div_ceil(2);
        max -= (max - target).div_ceil(2);
        capability = capability.constrain(min, max).expect("narrower range");
        assert_eq!(capability.eval(target).expect("target"), prf.eval(target).expect("root"));
    }

    assert_eq!(capability.len(), 1);
    assert!(capability.elements()[0].is_leaf());
}

#[test]
fn decomposition_is_logarithmic() {
    let prf = prf_from(9, 20);
    let capability = prf.constrain(1, RcPrfParams::max_leaf_index(20) - 1).expect("wide range");

    // One boundary path per side, each contributing at most two blocks per level.
    assert!(capability.len() <= 2 * 2 * 20, "{} elements", capability.len());
    assert_eq!(capability.leaf_count(), RcPrfParams::max_leaf_index(20) - 1);
}

#[test]
fn different_keys_give_different_outputs() {
    let a = prf_from(1, 10);
    let b = prf_from(2, 10);

    for leaf in [0, 1, 512, 1_023] {
        assert_ne!(a.eval(leaf).expect("a"), b.eval(leaf).expect("b"));
    }
}

#[test]
fn output_length_is_a_prefix() {
    let short = RcPrf::<16>::new(SecretKey::from_bytes([4u8; 32]), 8).expect("short");
    let long = RcPrf::<64>::new(SecretKey::from_bytes([4u8; 32]), 8).expect("long");

    for leaf in [0, 77, 255] {
        let short_out = short.eval(leaf).expect("short");
        let long_out = long.eval(leaf).expect("long");
        assert_eq!(short_out[..], long_out[..16]);
    }
}

fn nested_ranges(depth: Depth) -> impl Strategy<Value = (u64, u64, u64, u64, u64)> {
    let max_leaf = RcPrfParams::max_leaf_index(depth);
    (0..=max_leaf, 0..=max_leaf)
        .prop_map(|(a, b)| (a.min(b), a.max(b)))
        .prop_filter("whole tree", move |&(min, max)| !(min == 0 && max == max_leaf))
        .prop_flat_map(|(min, max)| {
            (min..=max, min..=max).prop_flat_map(move |(a, b)| {
                let (inner_min, inner_max) = (a.min(b), a.max(b));
                (Just(min), Just(max), Just(inner_min), Just(inner_max), inner_min..=inner_max)
            })
        })
}

proptest! {
    /// Constraining twice agrees with the root on a random leaf of the
    /// innermost range, at a depth too large to check exhaustively.
    #[test]
    fn prop_nested_constrain_consistent(
        seed in any::<u8>(),
        (min, max, inner_min, inner_max, leaf) in nested_ranges(40),
    ) {
        let prf = prf_from(seed, 40);
        let outer = prf.constrain(min, max).expect("outer");
        let inner = outer.constrain(inner_min, inner_max).expect("inner");

        prop_assert_eq!(inner.eval(leaf).expect("inner"), prf.eval(leaf).expect("root"));
        prop_assert_eq!(outer.eval(leaf).expect("outer"), prf.eval(leaf).expect("root"));
        prop_assert!(inner.len() <= 2 * 2 * 40);
    }

    /// Element ranges always tile the requested range exactly.
    #[test]
    fn prop_elements_tile_range(
        depth in 1u8..=64,
        a in any::<u64>(),
        b in any::<u64>(),
    ) {
        let max_leaf = RcPrfParams::max_leaf_index(depth);
        let half = max_leaf / 2;
        let (min, max) = (a % (half + 1), b % (half + 1) + half);
        prop_assume!(min <= max && !(min == 0 && max == max_leaf));

        let capability = prf_from(0, depth).constrain(min, max).expect("range");
        let elements = capability.elements();
        prop_assert_eq!(elements.first().map(|e| e.min()), Some(min));
        prop_assert_eq!(elements.last().map(|e| e.max()), Some(max));
        for pair in elements.windows(2) {
            prop_assert_eq!(pair[0].max() + 1, pair[1].min());
        }
    }

    /// No element could be replaced by a larger aligned block that still
    /// fits the requested range.
    #[test]
    fn prop_decomposition_is_minimal(
        depth in 2u8..=64,
        a in any::<u64>(),
        b in any::<u64>(),
    ) {
        let max_leaf = RcPrfParams::max_leaf_index(depth);
        let (x, y) = (a & max_leaf, b & max_leaf);
        let (min, max) = (x.min(y), x.max(y));
        prop_assume!(!(min == 0 && max == max_leaf));

        let capability = prf_from(0, depth).constrain(min, max).expect("range");
        for element in capability.elements() {
            // covered leaf pairs are emitted as two leaves
            let span = (u128::from(element.max() - element.min()) + 1).max(2);
            let parent_min = u128::from(element.min()) / (2 * span) * (2 * span);
            let parent_max = parent_min + 2 * span - 1;
            prop_assert!(
                parent_min < u128::from(min) || parent_max > u128::from(max),
                "[{}, {}] fits a larger block of [{min}, {max}]",
                element.min(),
                element.max()
            );
        }
    }
}

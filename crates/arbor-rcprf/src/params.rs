//! Tree geometry.
//!
//! A tree of depth `H` has `2^H` leaves indexed `0..=2^H - 1`. Depths at or
//! beyond [`RcPrfParams::MAX_HEIGHT`] saturate to the full `u64` index space.

/// Tree depth (also called height).
pub type Depth = u8;

/// Pure functions describing the combinatorics of the tree.
#[derive(Debug, Clone, Copy)]
pub struct RcPrfParams;

impl RcPrfParams {
    /// Largest supported depth; leaf indices of such a tree span all of `u64`.
    pub const MAX_HEIGHT: Depth = 64;

    /// Most leaves a single `eval_range` call will materialize.
    pub const MAX_BATCH_LEAVES: u64 = 1 << 20;

    /// Index of the last leaf of a tree of depth `depth`.
    ///
    /// Saturates to `u64::MAX` for `depth >= MAX_HEIGHT` instead of
    /// overflowing the shift.
    pub const fn max_leaf_index(depth: Depth) -> u64 {
        if depth >= Self::MAX_HEIGHT { u64::MAX } else { (1u64 << depth) - 1 }
    }

    /// Returns true if the closed intervals `[a_min, a_max]` and
    /// `[b_min, b_max]` share at least one index.
    pub const fn ranges_intersect(a_min: u64, a_max: u64, b_min: u64, b_max: u64) -> bool {
        a_min <= b_max && b_min <= a_max
    }

    /// Returns true if `depth` is a valid tree depth, i.e. in
    /// `1..=MAX_HEIGHT`.
    pub const fn is_valid_depth(depth: Depth) -> bool {
        depth >= 1 && depth <= Self::MAX_HEIGHT
    }

    /// Returns true if `[min, max]` is exactly the leaf span of an aligned
    /// subtree of height `height`: `2^height` leaves starting at a multiple
    /// of `2^height`.
    pub const fn is_aligned_subtree(min: u64, max: u64, height: Depth) -> bool {
        if min > max {
            return false;
        }
        let span = Self::max_leaf_index(height);
        max - min == span && min & span == 0
    }
}

/// Aligned block of `2^height` leaves starting at `min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Subtree {
    pub(crate) min: u64,
    pub(crate) height: Depth,
}

impl Subtree {
    pub(crate) const fn new(min: u64, height: Depth) -> Self {
        Self { min, height }
    }

    pub(crate) const fn max(self) -> u64 {
        self.min + RcPrfParams::max_leaf_index(self.height)
    }

    pub(crate) const fn is_covered_by(self, lo: u64, hi: u64) -> bool {
        lo <= self.min && self.max() <= hi
    }

    /// Lower and upper halves. Only meaningful for `height >= 1`.
    pub(crate) const fn children(self) -> (Self, Self) {
        let half = self.height - 1;
        let left = Self::new(self.min, half);
        let right = Self::new(self.min + (1u64 << half), half);
        (left, right)
    }
}

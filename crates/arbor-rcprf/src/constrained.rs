//! Delegated capability over a contiguous leaf range.

use crate::{
    element::ConstrainedElement,
    error::RcPrfError,
    params::{Depth, RcPrfParams},
};

/// Ordered, gap-free, non-overlapping run of elements covering
/// `[min, max]`.
///
/// Produced by [`RcPrf::constrain`](crate::RcPrf::constrain) or by
/// re-constraining another `ConstrainedRcPrf`. Never holds the root key, so
/// it can only evaluate leaves inside its own range. Dropping it wipes every
/// element.
#[derive(Debug)]
pub struct ConstrainedRcPrf<const N: usize> {
    elements: Vec<ConstrainedElement<N>>,
    min: u64,
    max: u64,
    tree_height: Depth,
}

impl<const N: usize> ConstrainedRcPrf<N> {
    /// Builds a capability from elements sorted by range.
    ///
    /// Fails with `InvalidArgument` if `elements` is empty, if two
    /// neighbours overlap or leave a gap, or if the elements were carved
    /// from trees of different heights.
    pub fn new(elements: Vec<ConstrainedElement<N>>) -> Result<Self, RcPrfError> {
        let (Some(first), Some(last)) = (elements.first(), elements.last()) else {
            return Err(RcPrfError::invalid("a constrained PRF needs at least one element"));
        };
        let (min, max, tree_height) = (first.min(), last.max(), first.tree_height());

        for pair in elements.windows(2) {
            let [prev, next] = pair else { continue };

            if next.tree_height() != tree_height {
                return Err(RcPrfError::invalid(format!(
                    "element [{}, {}] has tree height {}, expected {tree_height}",
                    next.min(),
                    next.max(),
                    next.tree_height()
                )));
            }

            let Some(expected) = prev.max().checked_add(1) else {
                return Err(RcPrfError::invalid(format!(
                    "element [{}, {}] overlaps its predecessor",
                    next.min(),
                    next.max()
                )));
            };
            if next.min() < expected {
                return Err(RcPrfError::invalid(format!(
                    "element [{}, {}] overlaps [{}, {}]",
                    next.min(),
                    next.max(),
                    prev.min(),
                    prev.max()
                )));
            }
            if next.min() > expected {
                return Err(RcPrfError::invalid(format!(
                    "gap between [{}, {}] and [{}, {}]",
                    prev.min(),
                    prev.max(),
                    next.min(),
                    next.max()
                )));
            }
        }

        Ok(Self { elements, min, max, tree_height })
    }

    /// First covered leaf.
    pub fn min(&self) -> u64 {
        self.min
    }

    /// Last covered leaf.
    pub fn max(&self) -> u64 {
        self.max
    }

    /// Height of the tree the capability was carved from.
    pub fn tree_height(&self) -> Depth {
        self.tree_height
    }

    /// Elements in ascending range order.
    pub fn elements(&self) -> &[ConstrainedElement<N>] {
        &self.elements
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Always false; an empty capability cannot be built.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of covered leaves, saturating at `u64::MAX`.
    pub fn leaf_count(&self) -> u64 {
        (self.max - self.min).saturating_add(1)
    }

    /// Returns true if `leaf` can be evaluated.
    pub fn contains(&self, leaf: u64) -> bool {
        self.min <= leaf && leaf <= self.max
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

    fn element_for(&self, leaf: u64) -> Result<&ConstrainedElement<N>, RcPrfError> {
        let idx = self.elements.partition_point(|element| element.max() < leaf);
        self.elements
            .get(idx)
            .filter(|element| element.contains(leaf))
            .ok_or_else(|| RcPrfError::out_of_range(format!("no element covers leaf {leaf}")))
    }

    /// Evaluates a covered leaf.
    pub fn eval(&self, leaf: u64) -> Result<[u8; N], RcPrfError> {
        self.check_covers(leaf, leaf)?;
        self.element_for(leaf)?.eval(leaf)
    }

    /// Evaluates every leaf of `[min, max]`, in order.
    ///
    /// Ranges wider than [`RcPrfParams::MAX_BATCH_LEAVES`] fail with
    /// `OutOfRange`.
    pub fn eval_range(&self, min: u64, max: u64) -> Result<Vec<[u8; N]>, RcPrfError> {
        if min > max {
            return Err(RcPrfError::invalid(format!("empty range [{min}, {max}]")));
        }
        self.check_covers(min, max)?;
        let count = range_len(min, max)?;

        let mut out = Vec::with_capacity(count.min(MAX_PREALLOCATED_OUTPUTS));
        for element in self.intersecting(min, max) {
            element.eval_range(min.max(element.min()), max.min(element.max()), &mut out)?;
        }
        Ok(out)
    }

    /// Derives a narrower capability over `[min, max]`.
    ///
    /// Only the elements intersecting the request are split; the receiver
    /// is left untouched.
    pub fn constrain(&self, min: u64, max: u64) -> Result<Self, RcPrfError> {
        if min > max {
            return Err(RcPrfError::invalid(format!("empty range [{min}, {max}]")));
        }
        self.check_covers(min, max)?;

        let mut elements = Vec::new();
        for element in self.intersecting(min, max) {
            element.generate_constrained_subkeys(
                min.max(element.min()),
                max.min(element.max()),
                &mut elements,
            )?;
        }

        tracing::debug!(
            from_min = self.min,
            from_max = self.max,
            min,
            max,
            elements = elements.len(),
            "re-constrained"
        );

        Self::new(elements)
    }

    fn intersecting(&self, min: u64, max: u64) -> impl Iterator<Item = &ConstrainedElement<N>> {
        let start = self.elements.partition_point(|element| element.max() < min);
        self.elements[start..]
            .iter()
            .take_while(move |element| {
                RcPrfParams::ranges_intersect(element.min(), element.max(), min, max)
            })
    }
}

/// Upper bound on the up-front allocation of [`ConstrainedRcPrf::eval_range`]
/// and [`RcPrf::eval_range`](crate::RcPrf::eval_range).
pub(crate) const MAX_PREALLOCATED_OUTPUTS: usize = 1 << 16;

/// Number of leaves in `[min, max]` as a `usize`.
///
/// Fails with `OutOfRange` above [`RcPrfParams::MAX_BATCH_LEAVES`].
pub(crate) fn range_len(min: u64, max: u64) -> Result<usize, RcPrfError> {
    let count = (max - min).saturating_add(1);
    if count > RcPrfParams::MAX_BATCH_LEAVES {
        return Err(RcPrfError::out_of_range(format!(
            "[{min}, {max}] spans {count} leaves, batch limit is {}",
            RcPrfParams::MAX_BATCH_LEAVES
        )));
    }
    usize::try_from(count).map_err(|_| {
        RcPrfError::out_of_range(format!("[{min}, {max}] is too large to evaluate at once"))
    })
}

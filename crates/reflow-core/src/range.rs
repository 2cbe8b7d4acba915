//! Closed integer width-intervals and the disjoint-set algebra built on them.
//!
//! Every edge in the layout graph is timestamped with a [`RangeSet`]: the set of
//! viewport widths at which the relationship held. Viewport sweeps cover at most
//! a few thousand widths, so all operations are linear scans over small vectors.

use serde::{Deserialize, Serialize};

/// A closed integer interval `[min, max]`.
///
/// Invariant: `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub min: i32,
    pub max: i32,
}

impl Range {
    pub fn new(min: i32, max: i32) -> Self {
        debug_assert!(min <= max, "Range requires min <= max ({min} > {max})");
        Self { min, max }
    }

    pub fn single(width: i32) -> Self {
        Self {
            min: width,
            max: width,
        }
    }

    /// Number of integer widths covered.
    pub fn len(&self) -> u32 {
        (self.max - self.min) as u32 + 1
    }

    pub fn middle(&self) -> i32 {
        self.min + (self.max - self.min) / 2
    }

    pub fn contains(&self, width: i32) -> bool {
        self.min <= width && width <= self.max
    }

    pub fn overlaps(&self, other: &Range) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    /// Two ranges are mergeable when they overlap or the gap between them is
    /// at most one width (adjacent integers form one contiguous interval).
    pub fn is_mergeable(&self, other: &Range) -> bool {
        self.min <= other.max.saturating_add(1) && other.min <= self.max.saturating_add(1)
    }

    /// Union of two ranges as a minimal disjoint set: one range when the inputs
    /// are mergeable, both (in ascending order) otherwise.
    pub fn merge(&self, other: &Range) -> RangeSet {
        let mut set = RangeSet::new();
        set.insert(*self);
        set.insert(*other);
        set
    }

    /// Intersection, or `None` when the ranges do not overlap at all.
    ///
    /// Callers rely on the `None` case to distinguish "no overlap" from an
    /// overlap that happens to be a single width.
    pub fn overlapping_with(&self, other: &Range) -> Option<Range> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Range::new(self.min.max(other.min), self.max.min(other.max)))
    }

    /// The parts of `other` not covered by `self`.
    pub fn non_overlapping(&self, other: &Range) -> RangeSet {
        let mut set = RangeSet::new();
        if other.min < self.min {
            set.insert(Range::new(other.min, other.max.min(self.min - 1)));
        }
        if other.max > self.max {
            set.insert(Range::new(other.min.max(self.max + 1), other.max));
        }
        set
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// A sorted list of pairwise-disjoint, non-mergeable [`Range`]s.
///
/// Insertion keeps the invariant eagerly: a new range is merged with every
/// overlapping or adjacent neighbour before being spliced back in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSet {
    ranges: Vec<Range>,
}

impl RangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    pub fn min(&self) -> Option<i32> {
        self.ranges.first().map(|r| r.min)
    }

    pub fn max(&self) -> Option<i32> {
        self.ranges.last().map(|r| r.max)
    }

    pub fn contains(&self, width: i32) -> bool {
        self.ranges.iter().any(|r| r.contains(width))
    }

    /// Insert a range, merging with every mergeable neighbour.
    pub fn insert(&mut self, range: Range) {
        let mut merged = range;
        let mut out: Vec<Range> = Vec::with_capacity(self.ranges.len() + 1);
        let mut placed = false;
        for existing in self.ranges.drain(..) {
            if existing.is_mergeable(&merged) {
                merged = Range::new(existing.min.min(merged.min), existing.max.max(merged.max));
            } else if existing.max < merged.min {
                out.push(existing);
            } else {
                if !placed {
                    out.push(merged);
                    placed = true;
                }
                out.push(existing);
            }
        }
        if !placed {
            out.push(merged);
        }
        self.ranges = out;
    }

    pub fn insert_width(&mut self, width: i32) {
        self.insert(Range::single(width));
    }

    pub fn union(&self, other: &RangeSet) -> RangeSet {
        let mut out = self.clone();
        for r in &other.ranges {
            out.insert(*r);
        }
        out
    }

    /// The widths of `self` not covered by `other`.
    pub fn difference(&self, other: &RangeSet) -> RangeSet {
        let mut out = RangeSet::new();
        for r in &self.ranges {
            let mut remainder = vec![*r];
            for cut in &other.ranges {
                let mut next = Vec::with_capacity(remainder.len());
                for piece in remainder {
                    for part in cut.non_overlapping(&piece).ranges() {
                        next.push(*part);
                    }
                }
                remainder = next;
            }
            for piece in remainder {
                out.insert(piece);
            }
        }
        out
    }

    pub fn intersection(&self, other: &RangeSet) -> RangeSet {
        let mut out = RangeSet::new();
        for a in &self.ranges {
            for b in &other.ranges {
                if let Some(both) = a.overlapping_with(b) {
                    out.insert(both);
                }
            }
        }
        out
    }

    /// Every individual width covered, ascending.
    pub fn widths(&self) -> impl Iterator<Item = i32> + '_ {
        self.ranges.iter().flat_map(|r| r.min..=r.max)
    }
}

impl From<Range> for RangeSet {
    fn from(range: Range) -> Self {
        let mut set = RangeSet::new();
        set.insert(range);
        set
    }
}

impl FromIterator<Range> for RangeSet {
    fn from_iter<T: IntoIterator<Item = Range>>(iter: T) -> Self {
        let mut set = RangeSet::new();
        for r in iter {
            set.insert(r);
        }
        set
    }
}

impl std::fmt::Display for RangeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, r) in self.ranges.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{r}")?;
        }
        write!(f, "}}")
    }
}

//! Axis-aligned element rectangles and the tolerance-aware spatial predicates
//! the layout graph is built from.
//!
//! Browsers report sub-pixel jitter at some widths, so every comparison takes a
//! pixel tolerance. A missing or malformed box degrades to a sentinel rectangle
//! with all flags false instead of an error; graph construction silently skips
//! such rectangles.

use crate::driver::RawBox;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub visible: bool,
    pub valid_size: bool,
    pub positive_coordinates: bool,
}

/// How far a child sticks out past each edge of its parent (0 when inside).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Protrusion {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Protrusion {
    pub fn any(&self) -> bool {
        self.left > 0.0 || self.right > 0.0 || self.top > 0.0 || self.bottom > 0.0
    }

    pub fn beyond(&self, tolerance: f64) -> bool {
        self.left > tolerance
            || self.right > tolerance
            || self.top > tolerance
            || self.bottom > tolerance
    }
}

/// Distances two colliding siblings would have to move to stop overlapping.
///
/// `second_clears` is true when the second rectangle is the one starting
/// further right, i.e. the one expected to move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionClear {
    pub x_to_clear: f64,
    pub y_to_clear: f64,
    pub second_clears: bool,
}

impl Rectangle {
    /// Sentinel for a missing/invalid box: all flags false, never indexed.
    pub fn invisible() -> Self {
        Self {
            min_x: 0.0,
            max_x: 0.0,
            min_y: 0.0,
            max_y: 0.0,
            visible: false,
            valid_size: false,
            positive_coordinates: false,
        }
    }

    pub fn from_box(raw: Option<&RawBox>) -> Self {
        let Some(raw) = raw else {
            return Self::invisible();
        };
        if !raw.x.is_finite() || !raw.y.is_finite() || !raw.width.is_finite() || !raw.height.is_finite()
        {
            return Self::invisible();
        }
        let min_x = raw.x;
        let min_y = raw.y;
        let max_x = raw.x + raw.width;
        let max_y = raw.y + raw.height;
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
            visible: true,
            valid_size: raw.width > 0.0 && raw.height > 0.0,
            positive_coordinates: max_x >= 0.0 && max_y >= 0.0,
        }
    }

    pub fn from_bounds(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
            visible: true,
            valid_size: max_x > min_x && max_y > min_y,
            positive_coordinates: max_x >= 0.0 && max_y >= 0.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Usable rectangles are the only ones that participate in the graph.
    pub fn is_usable(&self) -> bool {
        self.visible && self.valid_size && self.positive_coordinates
    }

    /// The same rectangle with its bottom edge pushed to infinity. Applied to
    /// the document root before indexing so a visually short root still
    /// contains its descendants and the viewport bottom never protrudes.
    pub fn with_unbounded_bottom(&self) -> Self {
        Self {
            max_y: f64::INFINITY,
            ..*self
        }
    }

    /// Shrink all four edges inward by `amount` (used for tolerance-shrunk
    /// sibling overlap so touching siblings do not register).
    pub fn shrunk(&self, amount: f64) -> Self {
        Self {
            min_x: self.min_x + amount,
            max_x: self.max_x - amount,
            min_y: self.min_y + amount,
            max_y: self.max_y - amount,
            ..*self
        }
    }

    /// Raw axis-aligned intersection test, no tolerance. Used only by the
    /// spatial index; relationship classification goes through the
    /// tolerance-aware predicates below.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// True when `other` sits entirely above this rectangle's top edge,
    /// allowing `tolerance` px of overhang.
    pub fn is_above_me(&self, other: &Rectangle, tolerance: f64) -> bool {
        other.max_y <= self.min_y + tolerance
    }

    pub fn is_below_me(&self, other: &Rectangle, tolerance: f64) -> bool {
        other.min_y >= self.max_y - tolerance
    }

    pub fn is_to_my_left(&self, other: &Rectangle, tolerance: f64) -> bool {
        other.max_x <= self.min_x + tolerance
    }

    pub fn is_to_my_right(&self, other: &Rectangle, tolerance: f64) -> bool {
        other.min_x >= self.max_x - tolerance
    }

    /// Overlap is the residual case: `other` overlaps when it is not
    /// definitively on any one side. Touching-but-not-crossing boundaries fall
    /// into a side predicate first and therefore never count as overlap.
    pub fn is_overlapping(&self, other: &Rectangle, tolerance: f64) -> bool {
        !(self.is_above_me(other, tolerance)
            || self.is_below_me(other, tolerance)
            || self.is_to_my_left(other, tolerance)
            || self.is_to_my_right(other, tolerance))
    }

    /// Tolerance-aware containment: `other` may poke out up to `tolerance` px
    /// on each side and still count as contained.
    pub fn contains(&self, other: &Rectangle, tolerance: f64) -> bool {
        self.min_x - tolerance <= other.min_x
            && other.max_x <= self.max_x + tolerance
            && self.min_y - tolerance <= other.min_y
            && other.max_y <= self.max_y + tolerance
    }

    pub fn same_bounds(&self, other: &Rectangle, tolerance: f64) -> bool {
        (self.min_x - other.min_x).abs() <= tolerance
            && (self.max_x - other.max_x).abs() <= tolerance
            && (self.min_y - other.min_y).abs() <= tolerance
            && (self.max_y - other.max_y).abs() <= tolerance
    }

    /// How far `child` protrudes past each of this rectangle's edges.
    pub fn protrusion(&self, child: &Rectangle) -> Protrusion {
        Protrusion {
            left: (self.min_x - child.min_x).max(0.0),
            right: (child.max_x - self.max_x).max(0.0),
            top: (self.min_y - child.min_y).max(0.0),
            bottom: (child.max_y - self.max_y).max(0.0),
        }
    }

    /// Clearance a colliding pair needs; the rectangle starting further right
    /// is the one that clears.
    pub fn collision_clear(&self, other: &Rectangle) -> CollisionClear {
        let second_clears = other.min_x >= self.min_x;
        let (left, right) = if second_clears {
            (self, other)
        } else {
            (other, self)
        };
        CollisionClear {
            x_to_clear: left.max_x - right.min_x + 1.0,
            y_to_clear: left.max_y - right.min_y + 1.0,
            second_clears,
        }
    }
}

impl std::fmt::Display for Rectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {})-({}, {})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

//! Detected layout failures.
//!
//! One sum type instead of a class hierarchy: every variant carries only the
//! node references its rule needs, and downstream classification/repair logic
//! dispatches with an exhaustive match.

use reflow_core::{Range, Rectangle};

use crate::build::Graph;
use crate::node::NodeId;
use crate::path;

/// Which pairwise relations held between two siblings at a given width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RelationSignature {
    pub overlapping: bool,
    /// `b` is above `a`.
    pub above: bool,
    /// `b` is below `a`.
    pub below: bool,
    /// `b` is left of `a`.
    pub left: bool,
    /// `b` is right of `a`.
    pub right: bool,
}

impl RelationSignature {
    /// The relations `b` holds toward `a` as seen inside their shared parent.
    ///
    /// A sibling counts as above/below/left/right when it reaches into the
    /// strip of the parent lying strictly beyond the corresponding edge of
    /// `a` (or, mirrored, when `a` reaches past the opposite edge of `b`), so
    /// a partially overlapping pair can carry a directional relation too.
    /// Both graph construction and live re-probing derive signatures through
    /// here and cannot drift apart.
    pub fn between(parent: &Rectangle, a: &Rectangle, b: &Rectangle, tolerance: f64) -> Self {
        let reaches = |strip: Option<Rectangle>, other: &Rectangle| {
            strip.is_some_and(|s| overlaps_strictly(&s, other))
        };
        Self {
            overlapping: a.is_overlapping(b, tolerance),
            above: reaches(strip_above(parent, a), b) || reaches(strip_below(parent, b), a),
            below: reaches(strip_below(parent, a), b) || reaches(strip_above(parent, b), a),
            left: reaches(strip_left(parent, a), b) || reaches(strip_right(parent, b), a),
            right: reaches(strip_right(parent, a), b) || reaches(strip_left(parent, b), a),
        }
    }
}

fn strip_above(parent: &Rectangle, sibling: &Rectangle) -> Option<Rectangle> {
    (sibling.min_y > parent.min_y).then(|| {
        Rectangle::from_bounds(parent.min_x, parent.max_x, parent.min_y, sibling.min_y)
    })
}

fn strip_below(parent: &Rectangle, sibling: &Rectangle) -> Option<Rectangle> {
    (sibling.max_y < parent.max_y).then(|| {
        Rectangle::from_bounds(parent.min_x, parent.max_x, sibling.max_y, parent.max_y)
    })
}

fn strip_left(parent: &Rectangle, sibling: &Rectangle) -> Option<Rectangle> {
    (sibling.min_x > parent.min_x).then(|| {
        Rectangle::from_bounds(parent.min_x, sibling.min_x, parent.min_y, parent.max_y)
    })
}

fn strip_right(parent: &Rectangle, sibling: &Rectangle) -> Option<Rectangle> {
    (sibling.max_x < parent.max_x).then(|| {
        Rectangle::from_bounds(sibling.max_x, parent.max_x, parent.min_y, parent.max_y)
    })
}

fn overlaps_strictly(strip: &Rectangle, other: &Rectangle) -> bool {
    strip.min_x < other.max_x
        && other.min_x < strip.max_x
        && strip.min_y < other.max_y
        && other.min_y < strip.max_y
}

#[derive(Debug, Clone, PartialEq)]
pub enum FailureKind {
    /// Two siblings overlap; siblings should never overlap.
    Collision { a: NodeId, b: NodeId },
    /// A child escapes the ancestor it belonged to.
    ElementProtrusion { child: NodeId, parent: NodeId },
    /// The escaped ancestor is the document root. Fires only for left, right
    /// or top overtravel; the root's unbounded bottom makes bottom overtravel
    /// unobservable by construction.
    ViewportProtrusion { node: NodeId, root: NodeId },
    /// A sibling-pair relation that holds only in a sliver of widths.
    SmallRange {
        a: NodeId,
        b: NodeId,
        signature: RelationSignature,
    },
    /// A row member dropped below the rest of its row.
    Wrapping { node: NodeId, row: Vec<NodeId> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub kind: FailureKind,
    /// The maximal contiguous width interval over which the failure held.
    pub range: Range,
}

impl Failure {
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            FailureKind::Collision { .. } => "Collision",
            FailureKind::ElementProtrusion { .. } => "ElementProtrusion",
            FailureKind::ViewportProtrusion { .. } => "ViewportProtrusion",
            FailureKind::SmallRange { .. } => "SmallRange",
            FailureKind::Wrapping { .. } => "Wrapping",
        }
    }

    /// The one or two structural paths a report names for this failure. For
    /// wrapping the second path is the first row member.
    pub fn involved_paths<'g>(&self, graph: &'g Graph) -> (&'g str, Option<&'g str>) {
        match &self.kind {
            FailureKind::Collision { a, b } => (graph.path(*a), Some(graph.path(*b))),
            FailureKind::ElementProtrusion { child, parent } => {
                (graph.path(*child), Some(graph.path(*parent)))
            }
            FailureKind::ViewportProtrusion { node, root } => {
                (graph.path(*node), Some(graph.path(*root)))
            }
            FailureKind::SmallRange { a, b, .. } => (graph.path(*a), Some(graph.path(*b))),
            FailureKind::Wrapping { node, row } => (
                graph.path(*node),
                row.first().map(|id| graph.path(*id)),
            ),
        }
    }

    /// Structural-path identity used for dedup; symmetric pairs compare
    /// order-independently.
    pub fn same_failure(&self, other: &Failure, graph: &Graph) -> bool {
        if self.range != other.range {
            return false;
        }
        match (&self.kind, &other.kind) {
            (FailureKind::Collision { a, b }, FailureKind::Collision { a: c, b: d })
            | (
                FailureKind::SmallRange { a, b, .. },
                FailureKind::SmallRange { a: c, b: d, .. },
            ) => {
                let (pa, pb) = (graph.path(*a), graph.path(*b));
                let (pc, pd) = (graph.path(*c), graph.path(*d));
                (pa == pc && pb == pd) || (pa == pd && pb == pc)
            }
            (
                FailureKind::ElementProtrusion { child, parent },
                FailureKind::ElementProtrusion {
                    child: c,
                    parent: p,
                },
            ) => graph.path(*child) == graph.path(*c) && graph.path(*parent) == graph.path(*p),
            (
                FailureKind::ViewportProtrusion { node, .. },
                FailureKind::ViewportProtrusion { node: n, .. },
            ) => graph.path(*node) == graph.path(*n),
            (FailureKind::Wrapping { node, .. }, FailureKind::Wrapping { node: n, .. }) => {
                graph.path(*node) == graph.path(*n)
            }
            _ => false,
        }
    }

    /// Looser comparison used when a mini-graph is rebuilt at a different
    /// granularity during repair confirmation: same kind, overlapping ranges,
    /// and the primary node found this time may be a descendant or ancestor of
    /// the one found originally.
    pub fn is_equivalent(
        &self,
        self_graph: &Graph,
        other: &Failure,
        other_graph: &Graph,
    ) -> bool {
        if std::mem::discriminant(&self.kind) != std::mem::discriminant(&other.kind) {
            return false;
        }
        if !self.range.overlaps(&other.range) {
            return false;
        }
        let (mine, _) = self.involved_paths(self_graph);
        let (theirs, _) = other.involved_paths(other_graph);
        if path::is_related(mine, theirs) {
            return true;
        }
        // Symmetric pairs can surface in either order.
        match (&self.kind, &other.kind) {
            (FailureKind::Collision { b, .. }, FailureKind::Collision { b: d, .. })
            | (
                FailureKind::SmallRange { b, .. },
                FailureKind::SmallRange { b: d, .. },
            ) => {
                path::is_related(self_graph.path(*b), theirs)
                    || path::is_related(mine, other_graph.path(*d))
            }
            _ => false,
        }
    }
}

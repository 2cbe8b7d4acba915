//! Graph nodes and width-ranged edges.
//!
//! Nodes live in an arena and edges store [`NodeId`] indices, never owning
//! references, so a cyclic ownership structure cannot exist at the type level.
//! Nodes are created lazily the first time a snapshot contains their path, are
//! never deleted, and accumulate edges monotonically as widths are ingested.

use reflow_core::RangeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Per-width justification/centering flags layered on a parent edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignmentRanges {
    pub top_justified: RangeSet,
    pub bottom_justified: RangeSet,
    pub left_justified: RangeSet,
    pub right_justified: RangeSet,
    pub horizontally_centered: RangeSet,
    pub vertically_centered: RangeSet,
}

/// Resolved parent relationship, recorded on the child.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentChildEdge {
    pub parent: NodeId,
    pub ranges: RangeSet,
    pub alignment: AlignmentRanges,
}

/// Symmetric or directional sibling relationship, recorded on both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct SiblingEdge {
    pub other: NodeId,
    pub ranges: RangeSet,
}

/// Geometric containment by some intersecting rectangle, independent of the
/// resolved parent. Used to suppress false protrusion positives when several
/// ancestors overlap the node.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerEdge {
    pub container: NodeId,
    pub ranges: RangeSet,
}

#[derive(Debug, Clone, Default)]
pub struct GraphNode {
    pub path: String,
    /// Widths at which the element was present and usable.
    pub existence: RangeSet,
    /// Parents resolved for this node, one edge per distinct parent.
    pub parents: Vec<ParentChildEdge>,
    /// Distinct children ever resolved under this node, in first-seen order.
    pub children: Vec<NodeId>,
    /// Siblings overlapping this node.
    pub overlaps: Vec<SiblingEdge>,
    /// Siblings above this node.
    pub above: Vec<SiblingEdge>,
    /// Siblings below this node.
    pub below: Vec<SiblingEdge>,
    /// Siblings to the left of this node.
    pub left: Vec<SiblingEdge>,
    /// Siblings to the right of this node.
    pub right: Vec<SiblingEdge>,
    pub containers: Vec<ContainerEdge>,
}

impl GraphNode {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn parent_edge(&self, parent: NodeId) -> Option<&ParentChildEdge> {
        self.parents.iter().find(|e| e.parent == parent)
    }

    pub fn parent_edge_mut(&mut self, parent: NodeId) -> &mut ParentChildEdge {
        if let Some(i) = self.parents.iter().position(|e| e.parent == parent) {
            return &mut self.parents[i];
        }
        self.parents.push(ParentChildEdge {
            parent,
            ranges: RangeSet::new(),
            alignment: AlignmentRanges::default(),
        });
        self.parents.last_mut().unwrap()
    }

    /// The parent resolved at `width`, if any.
    pub fn parent_at(&self, width: i32) -> Option<NodeId> {
        self.parents
            .iter()
            .find(|e| e.ranges.contains(width))
            .map(|e| e.parent)
    }

    pub fn container_edge_mut(&mut self, container: NodeId) -> &mut ContainerEdge {
        if let Some(i) = self.containers.iter().position(|e| e.container == container) {
            return &mut self.containers[i];
        }
        self.containers.push(ContainerEdge {
            container,
            ranges: RangeSet::new(),
        });
        self.containers.last_mut().unwrap()
    }

    /// Union of every container edge's ranges: the widths at which something
    /// geometrically contained this node.
    pub fn contained_ranges(&self) -> RangeSet {
        let mut out = RangeSet::new();
        for edge in &self.containers {
            out = out.union(&edge.ranges);
        }
        out
    }
}

pub(crate) fn sibling_edge_mut(edges: &mut Vec<SiblingEdge>, other: NodeId) -> &mut SiblingEdge {
    if let Some(i) = edges.iter().position(|e| e.other == other) {
        return &mut edges[i];
    }
    edges.push(SiblingEdge {
        other,
        ranges: RangeSet::new(),
    });
    edges.last_mut().unwrap()
}

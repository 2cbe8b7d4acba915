//! Per-width ingestion and containment resolution.
//!
//! Each call to [`Graph::ingest`] processes one width's snapshot in isolation:
//! index the usable rectangles, resolve a single parent per node through the
//! candidate cascade, derive sibling and container relations, and append the
//! width to every touched edge's range set. Widths must arrive strictly
//! monotonically (either direction); gaps are fine, reordering is not.

use indexmap::IndexMap;
use reflow_core::{Config, Error, Rectangle, Result, Snapshot};
use rustc_hash::FxBuildHasher;
use tracing::{debug, warn};

use crate::failure::RelationSignature;
use crate::node::{GraphNode, NodeId, SiblingEdge, sibling_edge_mut};
use crate::path;
use crate::spatial::SpatialIndex;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    index: HashMap<String, usize>,
    root: Option<NodeId>,
    last_width: Option<i32>,
    ascending: Option<bool>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &GraphNode {
        &self.nodes[id.0]
    }

    pub fn node_id(&self, path: &str) -> Option<NodeId> {
        self.index.get(path).copied().map(NodeId)
    }

    pub fn node_by_path(&self, path: &str) -> Result<&GraphNode> {
        self.node_id(path)
            .map(|id| self.node(id))
            .ok_or_else(|| Error::UnknownPath {
                path: path.to_string(),
            })
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn path(&self, id: NodeId) -> &str {
        &self.nodes[id.0].path
    }

    fn intern(&mut self, path: &str) -> NodeId {
        if let Some(&i) = self.index.get(path) {
            return NodeId(i);
        }
        let i = self.nodes.len();
        self.nodes.push(GraphNode::new(path));
        self.index.insert(path.to_string(), i);
        NodeId(i)
    }

    /// Ingest one width's snapshot.
    pub fn ingest(&mut self, snapshot: &Snapshot, config: &Config) -> Result<()> {
        let width = snapshot.width;
        if let Some(last) = self.last_width {
            if width == last {
                return Err(Error::OutOfOrderWidth { width, last });
            }
            let ascending = width > last;
            match self.ascending {
                None => self.ascending = Some(ascending),
                Some(expected) if expected != ascending => {
                    return Err(Error::OutOfOrderWidth { width, last });
                }
                Some(_) => {}
            }
        }

        // Geometry-invalid boxes degrade to the sentinel and are silently
        // excluded from indexing; they never error out of construction.
        let mut paths: Vec<&str> = Vec::with_capacity(snapshot.elements.len());
        let mut rects: Vec<Rectangle> = Vec::with_capacity(snapshot.elements.len());
        for sample in &snapshot.elements {
            let rect = Rectangle::from_box(sample.raw.as_ref());
            if !rect.is_usable() {
                continue;
            }
            paths.push(&sample.path);
            rects.push(rect);
        }
        if paths.is_empty() {
            self.last_width = Some(width);
            return Ok(());
        }

        let root_local = find_root(&paths);
        // The root's bottom is treated as unbounded so a visually short root
        // still contains its descendants and the viewport bottom never counts
        // as protruded.
        rects[root_local] = rects[root_local].with_unbounded_bottom();

        let ids: Vec<NodeId> = paths.iter().map(|p| self.intern(p)).collect();
        for &id in &ids {
            self.nodes[id.0].existence.insert_width(width);
        }
        self.root = Some(ids[root_local]);

        debug!(width, elements = paths.len(), "ingesting snapshot");

        let index = SpatialIndex::build(&rects);
        let mut resolved_parent: Vec<Option<usize>> = vec![None; rects.len()];

        for i in 0..rects.len() {
            let intersecting = index.intersecting(&rects[i], Some(i));

            // Every intersecting rectangle that geometrically contains this
            // node, independent of the parent resolved below. For identical
            // bounds (mutual containment within tolerance) only the
            // tie-broken ancestor counts.
            let containers: Vec<usize> = intersecting
                .iter()
                .copied()
                .filter(|&s| {
                    let s_contains = rects[s].contains(&rects[i], config.protrusion_tolerance);
                    let i_contains = rects[i].contains(&rects[s], config.protrusion_tolerance);
                    if s_contains && i_contains {
                        path::ancestor_by_tie_break(paths[s], paths[i]) == paths[s]
                    } else {
                        s_contains
                    }
                })
                .collect();
            for &s in &containers {
                let node = &mut self.nodes[ids[i].0];
                node.container_edge_mut(ids[s]).ranges.insert_width(width);
            }

            if i == root_local {
                continue;
            }

            let candidates = if containers.is_empty() {
                // Nothing geometrically contains this node at this width (it
                // protrudes out of everything it touches). Fall back to the
                // intersecting structural ancestors so the node keeps a parent
                // while the protrusion is recorded through the container set.
                let mut ancestors: Vec<usize> = intersecting
                    .iter()
                    .copied()
                    .filter(|&s| path::is_ancestor(paths[s], paths[i]))
                    .collect();
                if ancestors.is_empty() {
                    return Err(Error::NoParentCandidate {
                        path: paths[i].to_string(),
                        width,
                    });
                }
                ancestors.sort_by_key(|&s| std::cmp::Reverse(paths[s].len()));
                ancestors.truncate(1);
                ancestors
            } else {
                candidate_parents(&containers, &rects, config.equivalent_parent_tolerance)
            };

            let parent_local = resolve_parent(&candidates, &paths, i);
            let (child_id, parent_id) = (ids[i], ids[parent_local]);

            // Cycle prevention: degenerate geometry can propose a parent that
            // the child already transitively contains.
            if self.is_transitive_parent(child_id, parent_id) {
                warn!(
                    child = paths[i],
                    parent = paths[parent_local],
                    width,
                    "dropping parent edge that would close a cycle"
                );
                continue;
            }

            let edge = self.nodes[child_id.0].parent_edge_mut(parent_id);
            edge.ranges.insert_width(width);
            if config.track_alignment {
                record_alignment(edge, &rects[parent_local], &rects[i], width);
            }
            if !self.nodes[parent_id.0].children.contains(&child_id) {
                self.nodes[parent_id.0].children.push(child_id);
            }
            resolved_parent[i] = Some(parent_local);
        }

        self.record_sibling_relations(&ids, &rects, &resolved_parent, width, config);
        self.last_width = Some(width);
        Ok(())
    }

    /// True when `ancestor` is reachable from `start` by walking parent edges.
    fn is_transitive_parent(&self, ancestor: NodeId, start: NodeId) -> bool {
        let mut stack = vec![start];
        let mut seen: Vec<NodeId> = Vec::new();
        while let Some(id) = stack.pop() {
            if id == ancestor {
                return true;
            }
            if seen.contains(&id) {
                continue;
            }
            seen.push(id);
            for edge in &self.nodes[id.0].parents {
                stack.push(edge.parent);
            }
        }
        false
    }

    fn record_sibling_relations(
        &mut self,
        ids: &[NodeId],
        rects: &[Rectangle],
        resolved_parent: &[Option<usize>],
        width: i32,
        config: &Config,
    ) {
        let mut groups: IndexMap<usize, Vec<usize>> = IndexMap::new();
        for (i, parent) in resolved_parent.iter().enumerate() {
            if let Some(p) = parent {
                groups.entry(*p).or_default().push(i);
            }
        }

        // Overlap is tolerance-aware, so touching siblings resolve to a side
        // relation and never register as overlapping. Directional relations
        // come from the parent-space strip lying strictly beyond a sibling's
        // edge, which lets an overlapping pair stay directional as well.
        for (&parent_local, kids) in &groups {
            if kids.len() < 2 {
                continue;
            }
            let parent_rect = rects[parent_local];
            for (ki, &k) in kids.iter().enumerate() {
                for &o in &kids[ki + 1..] {
                    let sig = RelationSignature::between(
                        &parent_rect,
                        &rects[k],
                        &rects[o],
                        config.tolerance,
                    );
                    let (k, o) = (ids[k], ids[o]);
                    if sig.overlapping {
                        self.record_sibling(k, o, |n| &mut n.overlaps, width);
                        self.record_sibling(o, k, |n| &mut n.overlaps, width);
                    }
                    if sig.above {
                        self.record_sibling(k, o, |n| &mut n.above, width);
                        self.record_sibling(o, k, |n| &mut n.below, width);
                    }
                    if sig.below {
                        self.record_sibling(k, o, |n| &mut n.below, width);
                        self.record_sibling(o, k, |n| &mut n.above, width);
                    }
                    if sig.left {
                        self.record_sibling(k, o, |n| &mut n.left, width);
                        self.record_sibling(o, k, |n| &mut n.right, width);
                    }
                    if sig.right {
                        self.record_sibling(k, o, |n| &mut n.right, width);
                        self.record_sibling(o, k, |n| &mut n.left, width);
                    }
                }
            }
        }
    }

    fn record_sibling(
        &mut self,
        on: NodeId,
        other: NodeId,
        edges: impl FnOnce(&mut GraphNode) -> &mut Vec<SiblingEdge>,
        width: i32,
    ) {
        sibling_edge_mut(edges(&mut self.nodes[on.0]), other)
            .ranges
            .insert_width(width);
    }
}

/// The root is the element whose path is an ancestor of every other path;
/// degenerate snapshots fall back to the shortest (then lexicographically
/// smallest) path.
fn find_root(paths: &[&str]) -> usize {
    'outer: for (i, candidate) in paths.iter().enumerate() {
        for (j, other) in paths.iter().enumerate() {
            if i != j && !path::is_ancestor(candidate, other) {
                continue 'outer;
            }
        }
        return i;
    }
    let mut best = 0;
    for (i, p) in paths.iter().enumerate().skip(1) {
        let b = paths[best];
        if p.len() < b.len() || (p.len() == b.len() && *p < b) {
            best = i;
        }
    }
    best
}

/// Step 4: the smallest-area container plus every container whose trimmed area
/// still undercuts it (near-ties stay in as candidates).
fn candidate_parents(containers: &[usize], rects: &[Rectangle], trim: f64) -> Vec<usize> {
    let area = |r: &Rectangle| {
        if r.area().is_finite() {
            r.area()
        } else {
            f64::MAX
        }
    };
    let smallest = containers
        .iter()
        .map(|&c| area(&rects[c]))
        .fold(f64::MAX, f64::min);
    containers
        .iter()
        .copied()
        .filter(|&c| {
            let trimmed = rects[c].shrunk(trim);
            let trimmed_area = if trimmed.max_x > trimmed.min_x && trimmed.max_y > trimmed.min_y {
                area(&trimmed)
            } else {
                0.0
            };
            trimmed_area <= smallest
        })
        .collect()
}

/// Step 5: the resolution cascade. (a) longest strict structural ancestor,
/// else (b) longest common path prefix among unrelated "family" candidates,
/// else (c) the closest (shortest-path) descendant. Ties inside (b) and (c)
/// fall back to lexicographic path order; this mirrors the original tool and
/// is deliberately not generalized.
fn resolve_parent(candidates: &[usize], paths: &[&str], target: usize) -> usize {
    debug_assert!(!candidates.is_empty());
    let t = paths[target];

    let mut ancestors: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&c| path::is_ancestor(paths[c], t))
        .collect();
    if !ancestors.is_empty() {
        ancestors.sort_by(|&a, &b| {
            paths[b]
                .len()
                .cmp(&paths[a].len())
                .then_with(|| paths[a].cmp(paths[b]))
        });
        return ancestors[0];
    }

    let mut family: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&c| !path::is_related(paths[c], t))
        .collect();
    if !family.is_empty() {
        family.sort_by(|&a, &b| {
            path::common_prefix_len(paths[b], t)
                .cmp(&path::common_prefix_len(paths[a], t))
                .then_with(|| paths[a].cmp(paths[b]))
        });
        return family[0];
    }

    let mut descendants: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&c| path::is_ancestor(t, paths[c]))
        .collect();
    if descendants.is_empty() {
        // Candidates are ancestors, family or descendants; reaching here with
        // none left means a duplicate path slipped in. Stay deterministic.
        return candidates[0];
    }
    descendants.sort_by(|&a, &b| {
        paths[a]
            .len()
            .cmp(&paths[b].len())
            .then_with(|| paths[a].cmp(paths[b]))
    });
    descendants[0]
}

fn record_alignment(
    edge: &mut crate::node::ParentChildEdge,
    parent: &Rectangle,
    child: &Rectangle,
    width: i32,
) {
    let a = &mut edge.alignment;
    if child.min_y == parent.min_y {
        a.top_justified.insert_width(width);
    }
    if child.max_y == parent.max_y {
        a.bottom_justified.insert_width(width);
    }
    if child.min_x == parent.min_x {
        a.left_justified.insert_width(width);
    }
    if child.max_x == parent.max_x {
        a.right_justified.insert_width(width);
    }
    if child.min_x - parent.min_x == parent.max_x - child.max_x {
        a.horizontally_centered.insert_width(width);
    }
    if child.min_y - parent.min_y == parent.max_y - child.max_y {
        a.vertically_centered.insert_width(width);
    }
}


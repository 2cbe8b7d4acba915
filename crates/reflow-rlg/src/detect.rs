//! The five failure-detection rules, run once after every width is ingested.
//!
//! Each rule is a pure scan over the accumulated edge histories; none of them
//! touch the browser. A failure is created once per maximal contiguous failing
//! sub-range and deduplicated by structural-path identity.

use reflow_core::{Config, Range, RangeSet};

use crate::build::Graph;
use crate::failure::{Failure, FailureKind, RelationSignature};
use crate::node::{NodeId, SiblingEdge};

pub fn detect_failures(graph: &Graph, config: &Config) -> Vec<Failure> {
    let mut out: Vec<Failure> = Vec::new();
    detect_collisions(graph, &mut out);
    detect_protrusions(graph, &mut out);
    detect_small_ranges(graph, config, &mut out);
    detect_wrapping(graph, config, &mut out);
    out
}

fn push_dedup(out: &mut Vec<Failure>, graph: &Graph, failure: Failure) {
    if !out.iter().any(|f| f.same_failure(&failure, graph)) {
        out.push(failure);
    }
}

/// Siblings should never overlap: every range on an overlap edge is a failure.
fn detect_collisions(graph: &Graph, out: &mut Vec<Failure>) {
    for a in graph.node_ids() {
        for edge in &graph.node(a).overlaps {
            // Both directions carry the same ranges; emit each pair once.
            if edge.other < a {
                continue;
            }
            for range in edge.ranges.ranges() {
                push_dedup(
                    out,
                    graph,
                    Failure {
                        kind: FailureKind::Collision { a, b: edge.other },
                        range: *range,
                    },
                );
            }
        }
    }
}

/// A node contained by nothing that intersects it has escaped its ancestors.
/// The escaped ancestor is the parent resolved just outside the failing range
/// (preferring the wider side); when that ancestor is the document root the
/// failure is a viewport protrusion. Bottom overtravel cannot occur: the
/// root's bottom is unbounded before indexing.
fn detect_protrusions(graph: &Graph, out: &mut Vec<Failure>) {
    let root = graph.root();
    for id in graph.node_ids() {
        if Some(id) == root {
            continue;
        }
        let node = graph.node(id);
        if node.parents.is_empty() {
            continue;
        }
        let not_contained = node.existence.difference(&node.contained_ranges());
        for range in not_contained.ranges() {
            let ancestor = node
                .parent_at(range.max + 1)
                .or_else(|| node.parent_at(range.min - 1))
                .or_else(|| node.parent_at(range.max))
                .or_else(|| node.parents.first().map(|e| e.parent));
            let Some(ancestor) = ancestor else {
                continue;
            };
            let kind = if Some(ancestor) == root {
                FailureKind::ViewportProtrusion {
                    node: id,
                    root: ancestor,
                }
            } else {
                FailureKind::ElementProtrusion {
                    child: id,
                    parent: ancestor,
                }
            };
            push_dedup(out, graph, Failure {
                kind,
                range: *range,
            });
        }
    }
}

fn sibling_ranges(edges: &[SiblingEdge], other: NodeId) -> Option<&RangeSet> {
    edges.iter().find(|e| e.other == other).map(|e| &e.ranges)
}

fn signature_at(graph: &Graph, a: NodeId, b: NodeId, width: i32) -> RelationSignature {
    let node = graph.node(a);
    let holds = |edges: &[SiblingEdge]| {
        sibling_ranges(edges, b).is_some_and(|r| r.contains(width))
    };
    RelationSignature {
        overlapping: holds(&node.overlaps),
        above: holds(&node.above),
        below: holds(&node.below),
        left: holds(&node.left),
        right: holds(&node.right),
    }
}

/// A relation signature that holds only for a narrow sliver of widths, with
/// different stable signatures on both sides, is a strong signal of an
/// unintended transient state.
fn detect_small_ranges(graph: &Graph, config: &Config, out: &mut Vec<Failure>) {
    for a in graph.node_ids() {
        for b in sibling_partners(graph, a) {
            if b < a {
                continue;
            }
            let domain = graph.node(a).existence.intersection(&graph.node(b).existence);
            for stretch in domain.ranges() {
                let runs = signature_runs(graph, a, b, stretch);
                for i in 1..runs.len().saturating_sub(1) {
                    let (range, sig) = &runs[i];
                    let (_, prev) = &runs[i - 1];
                    let (_, next) = &runs[i + 1];
                    if range.len() < config.small_range_threshold && sig != prev && sig != next {
                        push_dedup(
                            out,
                            graph,
                            Failure {
                                kind: FailureKind::SmallRange {
                                    a,
                                    b,
                                    signature: *sig,
                                },
                                range: *range,
                            },
                        );
                    }
                }
            }
        }
    }
}

/// Every distinct sibling this node shares any relation edge with.
fn sibling_partners(graph: &Graph, id: NodeId) -> Vec<NodeId> {
    let node = graph.node(id);
    let mut partners: Vec<NodeId> = Vec::new();
    for edges in [
        &node.overlaps,
        &node.above,
        &node.below,
        &node.left,
        &node.right,
    ] {
        for edge in edges {
            if !partners.contains(&edge.other) {
                partners.push(edge.other);
            }
        }
    }
    partners.sort_unstable();
    partners
}

/// Maximal constant-signature runs across one contiguous stretch of widths.
fn signature_runs(
    graph: &Graph,
    a: NodeId,
    b: NodeId,
    stretch: &Range,
) -> Vec<(Range, RelationSignature)> {
    let mut runs: Vec<(Range, RelationSignature)> = Vec::new();
    for width in stretch.min..=stretch.max {
        let sig = signature_at(graph, a, b, width);
        match runs.last_mut() {
            Some((range, last)) if *last == sig && range.max == width - 1 => {
                range.max = width;
            }
            _ => runs.push((Range::single(width), sig)),
        }
    }
    runs
}

/// A node that was beside a row of siblings but sits below every one of them
/// at some widths has wrapped to the next line.
fn detect_wrapping(graph: &Graph, config: &Config, out: &mut Vec<Failure>) {
    for id in graph.node_ids() {
        let node = graph.node(id);
        let mut row: Vec<NodeId> = Vec::new();
        for edges in [&node.left, &node.right] {
            for edge in edges {
                if !row.contains(&edge.other) {
                    row.push(edge.other);
                }
            }
        }
        row.sort_unstable();
        if row.len() < config.row_threshold {
            continue;
        }

        let below_all = |width: i32| {
            row.iter().all(|&m| {
                sibling_ranges(&node.above, m).is_some_and(|r| r.contains(width))
            })
        };

        for stretch in node.existence.ranges() {
            let mut current: Option<Range> = None;
            for width in stretch.min..=stretch.max {
                if below_all(width) {
                    current = Some(match current {
                        Some(r) => Range::new(r.min, width),
                        None => Range::single(width),
                    });
                } else if let Some(range) = current.take() {
                    push_wrapping(out, graph, id, &row, range);
                }
            }
            if let Some(range) = current {
                push_wrapping(out, graph, id, &row, range);
            }
        }
    }
}

fn push_wrapping(out: &mut Vec<Failure>, graph: &Graph, node: NodeId, row: &[NodeId], range: Range) {
    push_dedup(
        out,
        graph,
        Failure {
            kind: FailureKind::Wrapping {
                node,
                row: row.to_vec(),
            },
            range,
        },
    );
}

//! Text dump of a graph: one block per node, edges indented beneath it with
//! their width ranges. The shape is consumed by external report writers and is
//! kept stable.

use std::fmt::Write as _;

use crate::build::Graph;

pub fn dump(graph: &Graph) -> String {
    let mut out = String::new();
    for id in graph.node_ids() {
        let node = graph.node(id);
        let _ = writeln!(out, "{} {}", node.path, node.existence);
        for edge in &node.parents {
            let _ = writeln!(out, "  parent {} {}", graph.path(edge.parent), edge.ranges);
        }
        for (label, edges) in [
            ("overlap", &node.overlaps),
            ("above", &node.above),
            ("below", &node.below),
            ("left", &node.left),
            ("right", &node.right),
        ] {
            for edge in edges {
                let _ = writeln!(out, "  {label} {} {}", graph.path(edge.other), edge.ranges);
            }
        }
        for edge in &node.containers {
            let _ = writeln!(
                out,
                "  container {} {}",
                graph.path(edge.container),
                edge.ranges
            );
        }
    }
    out
}

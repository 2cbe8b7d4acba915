#![forbid(unsafe_code)]

//! The Responsive Layout Graph (RLG).
//!
//! One node per unique structural path, one typed edge collection per
//! relationship kind, every edge timestamped with the set of viewport widths at
//! which the relationship held. Failures are discontinuities in those edge
//! histories.

pub mod build;
pub mod detect;
pub mod dump;
pub mod failure;
pub mod node;
pub mod path;
pub mod spatial;

pub use build::Graph;
pub use detect::detect_failures;
pub use failure::{Failure, FailureKind, RelationSignature};
pub use node::{
    AlignmentRanges, ContainerEdge, GraphNode, NodeId, ParentChildEdge, SiblingEdge,
};

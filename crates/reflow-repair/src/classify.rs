//! Five-point classification of a detected failure.
//!
//! The graph samples integer widths, so a failure's recorded boundaries can be
//! off by the discretization. Each failure is therefore re-tested against the
//! live page at five widths (just below the range, at its min, middle and
//! max, and just above) with the same predicate that triggered detection.
//! The resulting labels are the ground truth repair works from.

use reflow_core::{Config, Rectangle, Result, WebDriver};
use reflow_rlg::failure::{Failure, FailureKind, RelationSignature};
use reflow_rlg::{Graph, NodeId};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeLabel {
    TruePositive,
    FalsePositive,
}

impl std::fmt::Display for ProbeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeLabel::TruePositive => write!(f, "TP"),
            ProbeLabel::FalsePositive => write!(f, "FP"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub narrower: ProbeLabel,
    pub min: ProbeLabel,
    pub mid: ProbeLabel,
    pub max: ProbeLabel,
    pub wider: ProbeLabel,
}

impl Classification {
    /// A failure is worth repairing when it reproduces anywhere inside its
    /// recorded range.
    pub fn is_confirmed(&self) -> bool {
        [self.min, self.mid, self.max].contains(&ProbeLabel::TruePositive)
    }
}

pub fn classify<D: WebDriver>(
    driver: &mut D,
    graph: &Graph,
    failure: &Failure,
    config: &Config,
) -> Result<Classification> {
    let range = failure.range;
    let mut probe = |width: i32| -> Result<ProbeLabel> {
        driver.set_viewport(width, config.viewport_height)?;
        let holds = failure_holds_live(driver, graph, failure, width, config)?;
        debug!(width, holds, kind = failure.type_name(), "classification probe");
        Ok(if holds {
            ProbeLabel::TruePositive
        } else {
            ProbeLabel::FalsePositive
        })
    };
    Ok(Classification {
        narrower: probe(range.min - 1)?,
        min: probe(range.min)?,
        mid: probe(range.middle())?,
        max: probe(range.max)?,
        wider: probe(range.max + 1)?,
    })
}

/// Re-evaluate the predicate that triggered detection against the live page at
/// the given viewport width (the viewport must already be set).
///
/// Relation signatures are re-derived the way ingestion derived them: through
/// parent-space strips, against the live box of the node's resolved parent.
pub fn failure_holds_live<D: WebDriver>(
    driver: &mut D,
    graph: &Graph,
    failure: &Failure,
    width: i32,
    config: &Config,
) -> Result<bool> {
    Ok(match &failure.kind {
        FailureKind::Collision { a, b } => {
            let (ra, rb) = (live_rect(driver, graph, *a)?, live_rect(driver, graph, *b)?);
            ra.is_usable() && rb.is_usable() && ra.is_overlapping(&rb, config.tolerance)
        }
        FailureKind::ElementProtrusion { child, parent } => {
            let (rc, rp) = (
                live_rect(driver, graph, *child)?,
                live_rect(driver, graph, *parent)?,
            );
            rc.is_usable()
                && rp.is_usable()
                && rp.protrusion(&rc).beyond(config.protrusion_tolerance)
        }
        FailureKind::ViewportProtrusion { node, root } => {
            let (rn, rr) = (
                live_rect(driver, graph, *node)?,
                live_rect(driver, graph, *root)?,
            );
            // Bottom overtravel never counts: the root is open-ended downward.
            rn.is_usable()
                && rr.is_usable()
                && rr
                    .with_unbounded_bottom()
                    .protrusion(&rn)
                    .beyond(config.protrusion_tolerance)
        }
        FailureKind::SmallRange { a, b, signature } => {
            let (ra, rb) = (live_rect(driver, graph, *a)?, live_rect(driver, graph, *b)?);
            if !ra.is_usable() || !rb.is_usable() {
                false
            } else {
                match live_parent_rect(driver, graph, *a, width)? {
                    Some(rp) => {
                        RelationSignature::between(&rp, &ra, &rb, config.tolerance) == *signature
                    }
                    None => false,
                }
            }
        }
        FailureKind::Wrapping { node, row } => {
            let rn = live_rect(driver, graph, *node)?;
            let rp = live_parent_rect(driver, graph, *node, width)?;
            match rp {
                Some(rp) if rn.is_usable() && !row.is_empty() => {
                    let mut wrapped = true;
                    for member in row {
                        let rm = live_rect(driver, graph, *member)?;
                        if !rm.is_usable()
                            || !RelationSignature::between(&rp, &rn, &rm, config.tolerance).above
                        {
                            wrapped = false;
                            break;
                        }
                    }
                    wrapped
                }
                _ => false,
            }
        }
    })
}

/// Current box of a graph node on the live page.
fn live_rect<D: WebDriver>(driver: &mut D, graph: &Graph, id: NodeId) -> Result<Rectangle> {
    let raw = driver.rectangle(graph.path(id))?;
    Ok(Rectangle::from_box(raw.as_ref()))
}

/// Live box of the parent resolved for `id` at `width`, falling back to the
/// first recorded parent when the probe width lies outside every parent
/// edge's range. `None` when no parent was ever resolved or its box is
/// unusable.
fn live_parent_rect<D: WebDriver>(
    driver: &mut D,
    graph: &Graph,
    id: NodeId,
    width: i32,
) -> Result<Option<Rectangle>> {
    let node = graph.node(id);
    let Some(parent) = node
        .parent_at(width)
        .or_else(|| node.parents.first().map(|edge| edge.parent))
    else {
        return Ok(None);
    };
    let mut rect = live_rect(driver, graph, parent)?;
    if graph.root() == Some(parent) {
        // Ingestion treats the root as open-ended downward.
        rect = rect.with_unbounded_bottom();
    }
    Ok(rect.is_usable().then_some(rect))
}

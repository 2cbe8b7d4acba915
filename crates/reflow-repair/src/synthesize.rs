//! Donor-based repair synthesis and the confirmation loop.
//!
//! A repair copies the computed-style subtree of the donor viewport (a width
//! just outside the failing range where the page renders correctly), rescales
//! every pixel value to the viewport, scopes the result to the failing range
//! and adds a per-width scale ramp. The injected stylesheet is confirmed with
//! a DOM re-check and a mini-RLG rebuilt over the range, and removed again
//! either way; only the CSS text survives a confirmed repair.

use reflow_core::{Config, RepairStrategy, Result, WebDriver};
use reflow_rlg::failure::{Failure, FailureKind};
use reflow_rlg::{Graph, detect_failures};
use tracing::{debug, warn};

use crate::classify::{Classification, ProbeLabel, failure_holds_live};
use crate::css::{Repair, ScaleStep, rule_from_computed_style, selector_for_path};

#[derive(Debug, Clone, PartialEq)]
pub enum RepairOutcome {
    Repaired {
        strategy: RepairStrategy,
        /// Structural path of the restyled subtree root.
        applied_to: String,
        repair: Repair,
        css: String,
    },
    /// Every enabled strategy was attempted and rolled back. A normal terminal
    /// state, not an error.
    Failed,
}

impl RepairOutcome {
    pub fn is_repaired(&self) -> bool {
        matches!(self, RepairOutcome::Repaired { .. })
    }
}

/// Attempt each enabled donor strategy once, in configured order.
pub fn repair_failure<D: WebDriver>(
    driver: &mut D,
    graph: &Graph,
    failure: &Failure,
    classification: &Classification,
    config: &Config,
) -> Result<RepairOutcome> {
    for &strategy in &config.repair_strategies {
        let (donor, boundary_label) = match strategy {
            RepairStrategy::Wider => (failure.range.max + 1, classification.wider),
            RepairStrategy::Narrower => (failure.range.min - 1, classification.narrower),
        };
        // A donor that is itself failing has nothing worth transplanting.
        if boundary_label == ProbeLabel::TruePositive {
            debug!(?strategy, donor, "skipping strategy: donor width also fails");
            continue;
        }

        let (repair, applied_to) = synthesize(driver, graph, failure, donor, config)?;
        let css = repair.to_css();

        let handle = driver.add_repair(&css)?;
        let confirmed = match confirm(driver, graph, failure, config) {
            Ok(confirmed) => confirmed,
            Err(err) => {
                // Keep the acquire/release pairing even on an aborting probe.
                let _ = driver.remove_repair(handle);
                return Err(err);
            }
        };
        driver.remove_repair(handle)?;

        if confirmed {
            return Ok(RepairOutcome::Repaired {
                strategy,
                applied_to,
                repair,
                css,
            });
        }
        warn!(?strategy, donor, kind = failure.type_name(), "repair not confirmed, rolled back");
    }
    Ok(RepairOutcome::Failed)
}

/// The subtree that gets restyled: the protruding/wrapped node itself, or for
/// a collision the sibling starting further right (the one expected to move).
fn repair_root_path<D: WebDriver>(
    driver: &mut D,
    graph: &Graph,
    failure: &Failure,
) -> Result<String> {
    let path = match &failure.kind {
        FailureKind::Collision { a, b } => {
            let ra = reflow_core::Rectangle::from_box(driver.rectangle(graph.path(*a))?.as_ref());
            let rb = reflow_core::Rectangle::from_box(driver.rectangle(graph.path(*b))?.as_ref());
            if ra.is_usable() && rb.is_usable() && !ra.collision_clear(&rb).second_clears {
                graph.path(*a)
            } else {
                graph.path(*b)
            }
        }
        FailureKind::ElementProtrusion { child, .. } => graph.path(*child),
        FailureKind::ViewportProtrusion { node, .. } => graph.path(*node),
        FailureKind::SmallRange { a, .. } => graph.path(*a),
        FailureKind::Wrapping { node, .. } => graph.path(*node),
    };
    Ok(path.to_string())
}

/// Capture the donor viewport's computed-style subtree and turn it into a
/// scoped, scaled rule set plus the transform ramp.
fn synthesize<D: WebDriver>(
    driver: &mut D,
    graph: &Graph,
    failure: &Failure,
    donor: i32,
    config: &Config,
) -> Result<(Repair, String)> {
    driver.set_viewport(donor, config.viewport_height)?;
    let root_path = repair_root_path(driver, graph, failure)?;
    let denominator = donor + config.repair_cushion;

    let mut rules = Vec::new();
    let mut queue = vec![root_path.clone()];
    while let Some(path) = queue.pop() {
        let style = driver.computed_style(&path)?;
        rules.push(rule_from_computed_style(
            selector_for_path(&path),
            style.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            denominator,
        )?);
        let mut children = driver.children(&path)?;
        children.reverse();
        queue.extend(children);
    }

    let ramp = (failure.range.min..=failure.range.max)
        .map(|width| ScaleStep {
            width,
            ratio: f64::from(width) / f64::from(donor),
        })
        .collect();

    let repair = Repair {
        scope: failure.range,
        donor_width: donor,
        rules,
        ramp_selector: selector_for_path(&root_path),
        ramp,
    };
    Ok((repair, root_path))
}

/// DOM re-check at the middle of the failing range, then a mini-RLG rebuilt
/// over the range plus one width beyond each side. Both must come back clean.
fn confirm<D: WebDriver>(
    driver: &mut D,
    graph: &Graph,
    failure: &Failure,
    config: &Config,
) -> Result<bool> {
    let middle = failure.range.middle();
    driver.set_viewport(middle, config.viewport_height)?;
    if failure_holds_live(driver, graph, failure, middle, config)? {
        return Ok(false);
    }

    let mut mini = Graph::new();
    let mut width = failure.range.max + 1;
    while width >= failure.range.min - 1 {
        driver.set_viewport(width, config.viewport_height)?;
        let snapshot = driver.snapshot()?;
        mini.ingest(&snapshot, config)?;
        width -= 1;
    }
    let reoccurring = detect_failures(&mini, config)
        .iter()
        .any(|found| failure.is_equivalent(graph, found, &mini));
    Ok(!reoccurring)
}

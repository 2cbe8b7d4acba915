//! Checker configuration.
//!
//! One immutable struct threaded by reference through every consumer; there is
//! no process-wide settings state. Thresholds with no principled derivation
//! (`small_range_threshold`, `row_threshold`) are deliberately plain knobs.

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepairStrategy {
    /// Donate styles from the first width past the failing range's max.
    Wider,
    /// Donate styles from the first width below the failing range's min.
    Narrower,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pixel slack for all directional/overlap predicates.
    pub tolerance: f64,
    /// Pixel slack before a child counts as protruding from a container.
    pub protrusion_tolerance: f64,
    /// Containers whose trimmed area is within this much of the smallest
    /// container stay in the candidate-parent set.
    pub equivalent_parent_tolerance: f64,
    /// Maximal run of widths below this length triggers the small-range rule.
    pub small_range_threshold: u32,
    /// Minimum number of row siblings before the wrapping rule applies.
    pub row_threshold: usize,
    /// Extra pixels added to the donor width when scaling `calc()` values.
    pub repair_cushion: i32,
    /// Inclusive viewport sweep bounds.
    pub width_min: i32,
    pub width_max: i32,
    /// Viewport height used for every probe.
    pub viewport_height: i32,
    /// Record per-width justification/centering flags on parent edges.
    pub track_alignment: bool,
    /// Donor strategies attempted, in order, once each.
    pub repair_strategies: Vec<RepairStrategy>,
}

impl Config {
    /// Parse from a JSON document. Every field is optional and falls back to
    /// its default.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tolerance: 2.0,
            protrusion_tolerance: 2.0,
            equivalent_parent_tolerance: 1.0,
            small_range_threshold: 5,
            row_threshold: 2,
            repair_cushion: 0,
            width_min: 320,
            width_max: 1400,
            viewport_height: 1000,
            track_alignment: true,
            repair_strategies: vec![RepairStrategy::Wider, RepairStrategy::Narrower],
        }
    }
}

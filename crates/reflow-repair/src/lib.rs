#![forbid(unsafe_code)]

//! Classification and repair of detected layout failures.
//!
//! Classification probes each failure at five widths against the live page;
//! repair transplants a donor viewport's computed geometry into the failing
//! range as scaled CSS, then confirms (or rolls back) the injection.

pub mod classify;
pub mod css;
pub mod report;
pub mod stats;
pub mod synthesize;

pub use classify::{Classification, ProbeLabel, classify, failure_holds_live};
pub use css::{CssRule, Declaration, Repair, ScaleStep, selector_for_path};
pub use report::{CSV_HEADER, FailureRow, css_file_name};
pub use stats::RepairStatistics;
pub use synthesize::{RepairOutcome, repair_failure};

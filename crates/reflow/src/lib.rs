#![forbid(unsafe_code)]

//! Detect and automatically repair responsive layout failures.
//!
//! The pipeline: sweep a viewport width range one integer width at a time,
//! build a Responsive Layout Graph from the per-width snapshots, detect
//! discontinuities in its edge histories, classify each one against the live
//! page, and synthesize scaled CSS repairs from a donor viewport.

mod checker;

pub use checker::{Checker, ReportedFailure, RunReport};
pub use reflow_core::{
    Config, ElementSample, Error, RawBox, RepairStrategy, Result, ScriptedDriver, Snapshot,
    WebDriver,
};
pub use reflow_repair::{
    CSV_HEADER, Classification, ProbeLabel, Repair, RepairOutcome, RepairStatistics,
};
pub use reflow_rlg::{Failure, FailureKind, Graph, detect_failures};

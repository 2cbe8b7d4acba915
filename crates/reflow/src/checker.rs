//! End-to-end orchestration: sweep, detect, classify, repair, report.
//!
//! Everything here is strictly sequential. All probes share one mutable
//! browser viewport, so snapshot capture, classification and repair
//! confirmation serialize through the single driver; every injected repair is
//! removed again before the next unrelated probe.

use reflow_core::{Config, Result, WebDriver};
use reflow_repair::report::FailureRow;
use reflow_repair::{
    Classification, RepairOutcome, RepairStatistics, classify, repair_failure,
};
use reflow_rlg::{Failure, Graph, detect_failures, dump};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Checker {
    config: Config,
}

#[derive(Debug, Clone)]
pub struct ReportedFailure {
    pub fid: u32,
    pub failure: Failure,
    pub classification: Classification,
    /// `None` when classification wrote the failure off as a false positive.
    pub outcome: Option<RepairOutcome>,
}

#[derive(Debug)]
pub struct RunReport {
    pub webpage: String,
    pub run: u32,
    pub graph: Graph,
    pub graph_dump: String,
    pub failures: Vec<ReportedFailure>,
    pub statistics: RepairStatistics,
}

impl Checker {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sweep the configured width range (descending) on the driver's current
    /// page and run the full detect/classify/repair pipeline.
    pub fn run<D: WebDriver>(&self, driver: &mut D, webpage: &str, run: u32) -> Result<RunReport> {
        let config = &self.config;
        let mut graph = Graph::new();

        let mut width = config.width_max;
        while width >= config.width_min {
            driver.set_viewport(width, config.viewport_height)?;
            let snapshot = driver.snapshot()?;
            graph.ingest(&snapshot, config)?;
            width -= 1;
        }
        debug!(nodes = graph.len(), "graph built");

        let failures = detect_failures(&graph, config);
        info!(webpage, count = failures.len(), "failures detected");

        let mut statistics = RepairStatistics::new();
        let mut reported = Vec::with_capacity(failures.len());
        for (i, failure) in failures.into_iter().enumerate() {
            let fid = i as u32 + 1;
            statistics.record_detected(failure.type_name());

            let classification = classify(driver, &graph, &failure, config)?;
            let outcome = if classification.is_confirmed() {
                statistics.record_confirmed(failure.type_name());
                let outcome = repair_failure(driver, &graph, &failure, &classification, config)?;
                statistics.record_repair(failure.type_name(), outcome.is_repaired());
                Some(outcome)
            } else {
                None
            };

            reported.push(ReportedFailure {
                fid,
                failure,
                classification,
                outcome,
            });
        }

        Ok(RunReport {
            webpage: webpage.to_string(),
            run,
            graph_dump: dump::dump(&graph),
            graph,
            failures: reported,
            statistics,
        })
    }
}

impl RunReport {
    /// Serialize every failure as one fixed-column CSV row (header excluded).
    pub fn csv_rows(&self) -> Vec<String> {
        self.failures
            .iter()
            .map(|r| self.row_for(r).to_csv())
            .collect()
    }

    fn row_for(&self, reported: &ReportedFailure) -> FailureRow {
        let (xpath1, xpath2) = reported.failure.involved_paths(&self.graph);
        let (repair_applied, repair_applied_to) = match &reported.outcome {
            Some(RepairOutcome::Repaired { applied_to, .. }) => {
                ("Repaired", Some(applied_to.clone()))
            }
            Some(RepairOutcome::Failed) => ("Failed", None),
            None => ("-", None),
        };
        FailureRow {
            webpage: self.webpage.clone(),
            run: self.run,
            fid: reported.fid,
            type_name: reported.failure.type_name(),
            range_min: reported.failure.range.min,
            range_max: reported.failure.range.max,
            xpath1: xpath1.to_string(),
            xpath2: xpath2.map(str::to_string),
            classification: Some(reported.classification),
            repair_applied,
            repair_applied_to,
        }
    }
}

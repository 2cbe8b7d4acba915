//! Report-row serialization.
//!
//! File placement is the caller's business; the column layout and the CSS file
//! naming are contracts consumed by external report tooling and stay stable.

use crate::classify::{Classification, ProbeLabel};

pub const CSV_HEADER: &str = "Webpage,Run,FID,Type,RangeMin,RangeMax,XPath1,XPath2,\
ClassNarrower,ClassMin,ClassMid,ClassMax,ClassWider,RepairApplied,RepairAppliedTo";

#[derive(Debug, Clone, PartialEq)]
pub struct FailureRow {
    pub webpage: String,
    pub run: u32,
    pub fid: u32,
    pub type_name: &'static str,
    pub range_min: i32,
    pub range_max: i32,
    pub xpath1: String,
    pub xpath2: Option<String>,
    pub classification: Option<Classification>,
    /// "Repaired", "Failed" or "-" (no attempt).
    pub repair_applied: &'static str,
    pub repair_applied_to: Option<String>,
}

impl FailureRow {
    pub fn to_csv(&self) -> String {
        let class = |label: Option<ProbeLabel>| match label {
            Some(label) => label.to_string(),
            None => "-".to_string(),
        };
        let c = self.classification;
        [
            escape(&self.webpage),
            self.run.to_string(),
            self.fid.to_string(),
            self.type_name.to_string(),
            self.range_min.to_string(),
            self.range_max.to_string(),
            escape(&self.xpath1),
            escape(self.xpath2.as_deref().unwrap_or("-")),
            class(c.map(|c| c.narrower)),
            class(c.map(|c| c.min)),
            class(c.map(|c| c.mid)),
            class(c.map(|c| c.max)),
            class(c.map(|c| c.wider)),
            self.repair_applied.to_string(),
            escape(self.repair_applied_to.as_deref().unwrap_or("-")),
        ]
        .join(",")
    }
}

/// Relative path for a failure's CSS artifact under the run directory.
pub fn css_file_name(webpage: &str, fid: u32, repaired: bool) -> String {
    let bucket = if repaired { "repaired" } else { "failed" };
    format!("{bucket}/{webpage}-{fid}.css")
}

fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

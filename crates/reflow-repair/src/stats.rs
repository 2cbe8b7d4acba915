//! Per-category repair outcome counters. Purely additive.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub detected: u32,
    pub confirmed: u32,
    pub repaired: u32,
    pub failed: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairStatistics {
    categories: BTreeMap<&'static str, CategoryCounts>,
}

impl RepairStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_detected(&mut self, category: &'static str) {
        self.categories.entry(category).or_default().detected += 1;
    }

    pub fn record_confirmed(&mut self, category: &'static str) {
        self.categories.entry(category).or_default().confirmed += 1;
    }

    pub fn record_repair(&mut self, category: &'static str, repaired: bool) {
        let counts = self.categories.entry(category).or_default();
        if repaired {
            counts.repaired += 1;
        } else {
            counts.failed += 1;
        }
    }

    pub fn category(&self, category: &str) -> CategoryCounts {
        self.categories.get(category).copied().unwrap_or_default()
    }

    pub fn totals(&self) -> CategoryCounts {
        let mut total = CategoryCounts::default();
        for counts in self.categories.values() {
            total.detected += counts.detected;
            total.confirmed += counts.confirmed;
            total.repaired += counts.repaired;
            total.failed += counts.failed;
        }
        total
    }
}

impl std::fmt::Display for RepairStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (category, counts) in &self.categories {
            writeln!(
                f,
                "{category}: detected={} confirmed={} repaired={} failed={}",
                counts.detected, counts.confirmed, counts.repaired, counts.failed
            )?;
        }
        Ok(())
    }
}

//! Skipped-item summary generation for batch costing.

use super::CostError;
use serde::Serialize;
use std::collections::BTreeMap;

/// An item that was excluded from aggregation, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedItem {
    pub item_id: String,
    pub error: CostError,
}

impl SkippedItem {
    pub fn new(item_id: impl Into<String>, error: CostError) -> Self {
        Self {
            item_id: item_id.into(),
            error,
        }
    }
}

/// Summary of skipped items grouped by error kind.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SkipSummary {
    pub total: usize,
    pub by_kind: BTreeMap<String, Vec<String>>,
    pub sample_errors: Vec<SkippedItem>,
}

impl SkipSummary {
    pub fn from_skipped(skipped: &[SkippedItem]) -> Self {
        let mut by_kind: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for item in skipped {
            by_kind
                .entry(item.error.kind().to_string())
                .or_default()
                .push(item.item_id.clone());
        }

        // Take samples (up to 10 total)
        let sample_errors = skipped.iter().take(10).cloned().collect();

        Self {
            total: skipped.len(),
            by_kind,
            sample_errors,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// One-line headline suitable for user-facing reports.
    pub fn headline(&self) -> String {
        match self.total {
            0 => "No items skipped".to_string(),
            1 => "1 item skipped due to invalid data".to_string(),
            n => format!("{n} items skipped due to invalid data"),
        }
    }

    pub fn report(&self) -> String {
        let mut report = String::new();
        report.push_str(&self.headline());
        report.push('\n');

        if self.is_empty() {
            return report;
        }

        report.push_str("\nSkip reasons:\n");
        for (kind, ids) in &self.by_kind {
            report.push_str(&format!("  {}: {} item(s)\n", kind, ids.len()));

            for id in ids.iter().take(3) {
                report.push_str(&format!("    - {}\n", id));
            }

            if ids.len() > 3 {
                report.push_str(&format!("    ... and {} more\n", ids.len() - 3));
            }
        }

        report
    }
}

//! Outcome tracking for a conversion run.

use crate::error::ConvertError;
use crate::orchestrator::WorkItem;

/// A work item that could not be converted, with the reason.
#[derive(Debug)]
pub struct ItemFailure {
    pub item: WorkItem,
    pub error: ConvertError,
}

/// Per-item outcomes of a run, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Items whose target was written
    pub converted: Vec<WorkItem>,
    /// Items abandoned with a reason
    pub failed: Vec<ItemFailure>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of items attempted.
    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len()
    }

    /// Returns true if any item failed.
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn record_success(&mut self, item: WorkItem) {
        self.converted.push(item);
    }

    pub fn record_failure(&mut self, item: WorkItem, error: ConvertError) {
        self.failed.push(ItemFailure { item, error });
    }

    /// One-line summary for logs.
    pub fn format_summary(&self) -> String {
        format!(
            "{} of {} files converted, {} failed",
            self.converted.len(),
            self.total(),
            self.failed.len()
        )
    }
}

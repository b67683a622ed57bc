//! Per-stage outcome counters.

use serde::Serialize;
use std::fmt;

/// Counts for one persistence stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub label: String,
    /// Writes issued
    pub attempted: usize,
    /// Writes that changed the graph
    pub written: usize,
    /// Writes that found the item already present
    pub unchanged: usize,
    /// No-ops: missing endpoints, unmatched nodes, empty records
    pub skipped: usize,
    /// Writes that returned an error
    pub failed: usize,
}

impl StageReport {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Fold another report's counters into this one.
    pub fn absorb(&mut self, other: &StageReport) {
        self.attempted += other.attempted;
        self.written += other.written;
        self.unchanged += other.unchanged;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for StageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} attempted, {} written, {} unchanged, {} skipped, {} failed",
            self.label, self.attempted, self.written, self.unchanged, self.skipped, self.failed
        )
    }
}

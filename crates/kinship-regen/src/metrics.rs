//! Metrics collection for regeneration passes

use std::collections::HashMap;

/// Metrics collected across regeneration passes
///
/// Tracks subjects processed, failed and skipped, plus failures per error kind.
#[derive(Debug, Clone, Default)]
pub struct RegenMetrics {
    /// Subjects whose suggestions were regenerated
    pub processed: usize,

    /// Subjects whose regeneration returned an error
    pub failed: usize,

    /// Subjects not started because the pass was cancelled
    pub skipped: usize,

    /// Pending suggestions held after regeneration, summed over subjects
    pub suggestions: usize,

    /// Failures per error kind
    pub failures: HashMap<&'static str, usize>,

    /// Total passes completed
    pub pass_count: usize,

    /// Total runtime in milliseconds
    pub total_runtime_ms: u64,
}

impl RegenMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful subject
    pub fn record_success(&mut self, suggestions: usize) {
        self.processed += 1;
        self.suggestions += suggestions;
    }

    /// Record a failed subject
    pub fn record_failure(&mut self, kind: &'static str) {
        self.failed += 1;
        *self.failures.entry(kind).or_insert(0) += 1;
    }

    /// Record subjects skipped by cancellation
    pub fn record_skipped(&mut self, count: usize) {
        self.skipped += count;
    }

    /// Record a pass completion
    pub fn record_pass(&mut self, runtime_ms: u64) {
        self.pass_count += 1;
        self.total_runtime_ms += runtime_ms;
    }

    /// Subjects attempted (processed or failed)
    pub fn attempted(&self) -> usize {
        self.processed + self.failed
    }

    /// Add another set of metrics into this one
    pub fn absorb(&mut self, other: &RegenMetrics) {
        self.processed += other.processed;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.suggestions += other.suggestions;
        for (kind, count) in &other.failures {
            *self.failures.entry(*kind).or_insert(0) += count;
        }
        self.pass_count += other.pass_count;
        self.total_runtime_ms += other.total_runtime_ms;
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Regeneration Metrics Summary".to_string(),
            "============================".to_string(),
            format!("Passes: {}", self.pass_count),
            format!("Total runtime: {}ms", self.total_runtime_ms),
            format!("Processed: {}", self.processed),
            format!("Failed: {}", self.failed),
            format!("Skipped: {}", self.skipped),
            format!("Pending suggestions: {}", self.suggestions),
        ];

        if !self.failures.is_empty() {
            lines.push(String::new());
            lines.push("Failures by kind:".to_string());
            let mut kinds: Vec<_> = self.failures.iter().collect();
            kinds.sort();
            for (kind, count) in kinds {
                lines.push(format!("  {}: {}", kind, count));
            }
        }

        lines.join("\n")
    }
}

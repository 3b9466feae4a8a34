//! Output formatter trait

use nl2plan_application::{ArtifactPaths, BatchSummary, RunOutcome};

/// Trait for formatting run and batch results
pub trait OutputFormatter {
    /// Format one run with the files it wrote
    fn format_outcome(&self, outcome: &RunOutcome, paths: &ArtifactPaths) -> String;

    /// Format one run as JSON
    fn format_outcome_json(&self, outcome: &RunOutcome, paths: &ArtifactPaths) -> String;

    /// Format a finished batch
    fn format_summary(&self, summary: &BatchSummary) -> String;

    /// Format a finished batch as JSON
    fn format_summary_json(&self, summary: &BatchSummary) -> String;
}

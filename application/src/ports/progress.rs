//! Progress notification port
//!
//! Defines the callbacks a pipeline run reports through. Implementations
//! live in the presentation layer (spinner, plain console).

use crate::use_cases::run_pipeline::{OutcomeCode, PipelinePhase};

/// Callback for progress updates during a run or a batch
pub trait PipelineProgress: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: PipelinePhase);

    /// Called when a phase ends
    fn on_phase_complete(&self, phase: PipelinePhase, success: bool);

    /// Called after a failed extraction attempt
    fn on_retry(&self, _attempt: usize, _max_attempts: usize, _error: &str) {}

    // ==================== Batch Callbacks ====================

    /// Called before a batch task runs (`index` is 1-based)
    fn on_task_start(&self, _name: &str, _index: usize, _total: usize) {}

    /// Called when a batch task skips because its directory exists
    fn on_task_skipped(&self, _name: &str) {}

    /// Called after a batch task finishes
    fn on_task_complete(&self, _name: &str, _code: OutcomeCode) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl PipelineProgress for NoProgress {
    fn on_phase_start(&self, _phase: PipelinePhase) {}
    fn on_phase_complete(&self, _phase: PipelinePhase, _success: bool) {}
}

//! Application layer for nl2plan
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ExtractionParams, PipelineConfig};
pub use ports::{
    artifact_store::{ArtifactError, ArtifactStore},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    language_model::{LanguageModel, ModelError, TokenUsage},
    planner::{Planner, PlannerError},
    progress::{NoProgress, PipelineProgress},
};
pub use use_cases::assemble_model::{
    fill_template, AttemptError, ExtractError, ModelAssembler, TASK_PLACEHOLDER,
};
pub use use_cases::run_batch::{BatchRunner, BatchSummary, BatchTask, TaskRecord, SUMMARY_FILE};
pub use use_cases::run_pipeline::{
    error_chain, ArtifactPaths, OutcomeCode, PipelinePhase, PlanningAgent, RunOutcome,
};

//! Infrastructure layer for nl2plan
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod artifacts;
pub mod config;
pub mod logging;
pub mod planners;
pub mod process;
pub mod providers;

// Re-export commonly used types
pub use artifacts::FsArtifactStore;
pub use config::{
    ConfigLoader, FileConfig, FileExtractionConfig, FileModelConfig, FileOutputConfig,
    FilePipelineConfig, FilePlannerConfig, ModelKind,
};
pub use logging::JsonlConversationLogger;
pub use planners::CommandPlanner;
pub use providers::{CannedModel, CommandModel};

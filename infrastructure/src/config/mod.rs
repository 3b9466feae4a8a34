//! Configuration file loading for nl2plan
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `NL2PLAN_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./nl2plan.toml` or `./.nl2plan.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/nl2plan/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileExtractionConfig, FileModelConfig, FileOutputConfig, FilePipelineConfig,
    FilePlannerConfig, ModelKind,
};
pub use loader::ConfigLoader;

//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; string-typed enum fields are parsed and
//! checked by [`FileConfig::validate`].

mod extraction;
mod model;
mod output;
mod pipeline;
mod planner;

pub use extraction::FileExtractionConfig;
pub use model::{FileModelConfig, ModelKind};
pub use output::FileOutputConfig;
pub use pipeline::FilePipelineConfig;
pub use planner::FilePlannerConfig;

use nl2plan_application::PipelineConfig;
use nl2plan_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Model names, requirements and dialect
    pub pipeline: FilePipelineConfig,
    /// Retry loop and prompt template
    pub extraction: FileExtractionConfig,
    /// Language model adapter
    pub model: FileModelConfig,
    /// External planner
    pub planner: FilePlannerConfig,
    /// Artifact locations
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks enum fields, required commands and the derived
    /// [`PipelineConfig`] (names, retries, dialect against `htn`).
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.pipeline.parse_dialect().1);
        issues.extend(self.model.validate());
        issues.extend(self.planner.validate());

        // Template placeholder is checked by the caller once the template is loaded
        let pipeline = self.to_pipeline_config(nl2plan_application::TASK_PLACEHOLDER);
        issues.extend(pipeline.validate());

        issues
    }

    /// Build the per-run configuration around a loaded prompt template.
    ///
    /// An invalid dialect string falls back to the dialect implied by `htn`.
    pub fn to_pipeline_config(&self, template: impl Into<String>) -> PipelineConfig {
        PipelineConfig::new(template)
            .with_names(&self.pipeline.domain_name, &self.pipeline.problem_name)
            .with_requirements(self.pipeline.requirements.clone())
            .with_htn(self.pipeline.htn)
            .with_dialect(self.pipeline.parse_dialect().0)
            .with_extraction(self.extraction.to_params())
            .with_save_response(self.output.save_response)
    }
}

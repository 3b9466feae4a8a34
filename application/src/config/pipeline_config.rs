//! Pipeline configuration.
//!
//! Everything one [`PlanningAgent`](crate::use_cases::run_pipeline::PlanningAgent)
//! run needs besides its ports: model header, target dialect, prompt
//! template and retry parameters.

use super::extraction_params::ExtractionParams;
use crate::use_cases::assemble_model::TASK_PLACEHOLDER;
use nl2plan_domain::config::validation::validate_dialect;
use nl2plan_domain::{ConfigIssue, ConfigIssueCode, Dialect, ModelHeader};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub domain_name: String,
    pub problem_name: String,
    pub requirements: Vec<String>,
    pub is_htn: bool,
    /// `None` picks HDDL for hierarchical models and PDDL otherwise.
    pub dialect: Option<Dialect>,
    /// Prompt template containing `{task_desc}`.
    pub template: String,
    pub extraction: ExtractionParams,
    /// Persist the raw model response next to the rendered files.
    pub save_response: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            domain_name: "domain_placeholder".to_string(),
            problem_name: "problem_placeholder".to_string(),
            requirements: vec![":strips".to_string(), ":typing".to_string()],
            is_htn: false,
            dialect: None,
            template: TASK_PLACEHOLDER.to_string(),
            extraction: ExtractionParams::default(),
            save_response: true,
        }
    }
}

impl PipelineConfig {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            ..Self::default()
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_names(mut self, domain: impl Into<String>, problem: impl Into<String>) -> Self {
        self.domain_name = domain.into();
        self.problem_name = problem.into();
        self
    }

    pub fn with_requirements(mut self, requirements: Vec<String>) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn with_htn(mut self, is_htn: bool) -> Self {
        self.is_htn = is_htn;
        self
    }

    pub fn with_dialect(mut self, dialect: Option<Dialect>) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_extraction(mut self, extraction: ExtractionParams) -> Self {
        self.extraction = extraction;
        self
    }

    pub fn with_save_response(mut self, save: bool) -> Self {
        self.save_response = save;
        self
    }

    // ==================== Derived Values ====================

    pub fn header(&self) -> ModelHeader {
        ModelHeader::new(&self.domain_name, &self.problem_name)
            .with_requirements(self.requirements.clone())
            .with_htn(self.is_htn)
    }

    pub fn resolved_dialect(&self) -> Dialect {
        Dialect::resolve(self.dialect, self.is_htn)
    }

    /// Check the combination of settings, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        for (field, value) in [
            ("pipeline.domain_name", &self.domain_name),
            ("pipeline.problem_name", &self.problem_name),
        ] {
            if value.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyValue {
                        field: field.to_string(),
                    },
                    format!("{} must not be empty", field),
                ));
            }
        }

        if self.extraction.max_retries == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroRetries,
                "extraction.max_retries is 0; the model would never be queried",
            ));
        }

        if !self.template.contains(TASK_PLACEHOLDER) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::MissingPlaceholder,
                format!(
                    "prompt template has no {} placeholder; the task description will not be sent",
                    TASK_PLACEHOLDER
                ),
            ));
        }

        issues.extend(validate_dialect(self.dialect, self.is_htn));
        issues
    }
}

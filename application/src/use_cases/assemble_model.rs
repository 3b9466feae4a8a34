//! Model assembly use case.
//!
//! [`ModelAssembler`] queries a [`LanguageModel`] with a filled-in prompt
//! template, parses the response and keeps the result as the current
//! [`PlanningModel`] state. Malformed responses are retried a bounded
//! number of times with a fixed delay.

use crate::config::ExtractionParams;
use crate::ports::conversation_logger::{
    events, ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::language_model::{LanguageModel, ModelError};
use crate::ports::progress::{NoProgress, PipelineProgress};
use nl2plan_domain::{
    parse_response, Dialect, ExtractedModel, ModelHeader, ParseError, ParseIssue, PlanningModel,
    RenderError,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Placeholder replaced by the task description in prompt templates.
pub const TASK_PLACEHOLDER: &str = "{task_desc}";

/// Why a single attempt failed.
#[derive(Error, Debug)]
pub enum AttemptError {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Errors that end an extraction.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Max retries exceeded. Failed to extract the model after {attempts} attempt(s)")]
    RetriesExhausted {
        attempts: usize,
        #[source]
        last: AttemptError,
    },

    #[error("Max retries is 0; no extraction attempt was made")]
    NoAttempts,
}

/// Fill the task description into `template`.
///
/// Only the first placeholder is replaced; the description is inserted
/// verbatim.
pub fn fill_template(template: &str, task_description: &str) -> String {
    template.replacen(TASK_PLACEHOLDER, task_description, 1)
}

/// Owns the planning model of one run.
///
/// Not meant to be shared across concurrent runs; build one per task.
pub struct ModelAssembler {
    model: PlanningModel,
    issues: Vec<ParseIssue>,
    last_response: Option<String>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl ModelAssembler {
    pub fn new(header: ModelHeader) -> Self {
        Self {
            model: PlanningModel::new(header),
            issues: Vec::new(),
            last_response: None,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn header(&self) -> &ModelHeader {
        self.model.header()
    }

    pub fn model(&self) -> &PlanningModel {
        &self.model
    }

    /// The state stored by the last successful extraction.
    pub fn extracted(&self) -> Option<&ExtractedModel> {
        self.model.extracted()
    }

    /// Issues reported while parsing the last successful response.
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    pub fn last_response(&self) -> Option<&str> {
        self.last_response.as_deref()
    }

    /// Query `model` until a response parses, then store it.
    ///
    /// Returns the raw response of the successful attempt.
    pub async fn extract(
        &mut self,
        model: &dyn LanguageModel,
        task_description: &str,
        prompt_template: &str,
        params: &ExtractionParams,
    ) -> Result<String, ExtractError> {
        self.extract_with_progress(model, task_description, prompt_template, params, &NoProgress)
            .await
    }

    /// [`extract`](Self::extract) with retry callbacks.
    pub async fn extract_with_progress(
        &mut self,
        model: &dyn LanguageModel,
        task_description: &str,
        prompt_template: &str,
        params: &ExtractionParams,
        progress: &dyn PipelineProgress,
    ) -> Result<String, ExtractError> {
        model.reset_tokens();
        let prompt = fill_template(prompt_template, task_description);
        let is_htn = self.model.header().is_htn;

        info!(
            "Extracting {} model with {} (up to {} attempts)",
            if is_htn { "hierarchical" } else { "flat" },
            model.name(),
            params.max_retries
        );

        let mut last_error = None;
        for attempt in 1..=params.max_retries {
            model.reset_tokens();
            self.conversation_logger.log(ConversationEvent::new(
                events::PROMPT,
                serde_json::json!({
                    "model": model.name(),
                    "attempt": attempt,
                    "text": prompt,
                }),
            ));

            match self.attempt(model, &prompt, is_htn).await {
                Ok((extracted, issues, response)) => {
                    for issue in &issues {
                        warn!("{}", issue);
                        self.conversation_logger.log(ConversationEvent::new(
                            events::PARSE_ISSUE,
                            serde_json::json!({ "attempt": attempt, "issue": issue.to_string() }),
                        ));
                    }
                    info!(
                        "Extraction succeeded on attempt {}/{}: {} predicates, {} actions, {} tasks",
                        attempt,
                        params.max_retries,
                        extracted.predicates.len(),
                        extracted.actions.len(),
                        extracted.tasks.len()
                    );
                    self.model.replace(extracted);
                    self.issues = issues;
                    self.last_response = Some(response.clone());
                    return Ok(response);
                }
                Err(e) => {
                    warn!(
                        "Error encountered: {}. Retrying {}/{}...",
                        e, attempt, params.max_retries
                    );
                    debug!("Attempt {} failed: {:?}", attempt, e);
                    self.conversation_logger.log(ConversationEvent::new(
                        events::ATTEMPT_FAILED,
                        serde_json::json!({
                            "attempt": attempt,
                            "max_attempts": params.max_retries,
                            "error": e.to_string(),
                        }),
                    ));
                    progress.on_retry(attempt, params.max_retries, &e.to_string());
                    last_error = Some(e);

                    if attempt < params.max_retries && !params.retry_delay.is_zero() {
                        tokio::time::sleep(params.retry_delay).await;
                    }
                }
            }
        }

        match last_error {
            Some(last) => Err(ExtractError::RetriesExhausted {
                attempts: params.max_retries,
                last,
            }),
            None => Err(ExtractError::NoAttempts),
        }
    }

    async fn attempt(
        &self,
        model: &dyn LanguageModel,
        prompt: &str,
        is_htn: bool,
    ) -> Result<(ExtractedModel, Vec<ParseIssue>, String), AttemptError> {
        let response = model.query(prompt).await?;
        let usage = model.token_usage();
        debug!(
            "Received {} bytes from {} ({} tokens)",
            response.len(),
            model.name(),
            usage.total()
        );
        self.conversation_logger.log(ConversationEvent::new(
            events::RESPONSE,
            serde_json::json!({
                "model": model.name(),
                "bytes": response.len(),
                "input_tokens": usage.input_tokens,
                "output_tokens": usage.output_tokens,
                "text": response,
            }),
        ));

        let parsed = parse_response(&response, is_htn)?;
        Ok((parsed.value, parsed.issues, response))
    }

    /// Render the current state as a domain definition.
    pub fn render_domain(&self, dialect: Option<Dialect>) -> Result<String, RenderError> {
        self.model.render_domain(dialect)
    }

    /// Render the current state as a problem definition.
    pub fn render_problem(&self, dialect: Option<Dialect>) -> Result<String, RenderError> {
        self.model.render_problem(dialect)
    }
}

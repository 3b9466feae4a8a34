//! Command-backed model: pipes the prompt to an external program.
//!
//! Any CLI that reads a prompt on stdin and prints the completion on
//! stdout works, e.g. `llm -m gpt-4o` or `ollama run llama3`.

use crate::process::{run_shell, ProcessError};
use async_trait::async_trait;
use nl2plan_application::ports::language_model::{LanguageModel, ModelError, TokenUsage};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};

pub struct CommandModel {
    name: String,
    command: String,
    timeout: Option<Duration>,
    usage: Mutex<TokenUsage>,
}

impl CommandModel {
    pub fn new(command: impl Into<String>) -> Self {
        let command = command.into();
        let name = command
            .split_whitespace()
            .next()
            .unwrap_or("command")
            .to_string();
        Self {
            name,
            command,
            timeout: None,
            usage: Mutex::new(TokenUsage::default()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl LanguageModel for CommandModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query(&self, prompt: &str) -> Result<String, ModelError> {
        debug!("Sending {} bytes to `{}`", prompt.len(), self.command);
        let output = run_shell(&self.command, Some(prompt), self.timeout)
            .await
            .map_err(|e| match e {
                ProcessError::Timeout { secs, .. } => ModelError::Timeout(secs),
                other => ModelError::RequestFailed(other.to_string()),
            })?;

        if !output.success() {
            warn!(
                "`{}` exited with code {}",
                self.command,
                output.exit_code()
            );
            return Err(ModelError::RequestFailed(format!(
                "exit code {}: {}",
                output.exit_code(),
                output.stderr.trim()
            )));
        }

        if let Ok(mut usage) = self.usage.lock() {
            usage.record(prompt, &output.stdout);
        }
        Ok(output.stdout)
    }

    fn reset_tokens(&self) {
        if let Ok(mut usage) = self.usage.lock() {
            *usage = TokenUsage::default();
        }
    }

    fn token_usage(&self) -> TokenUsage {
        self.usage.lock().map(|u| *u).unwrap_or_default()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prompt_round_trip() {
        let model = CommandModel::new("cat");
        assert_eq!(model.name(), "cat");
        let response = model.query("# PREDICATES").await.unwrap();
        assert_eq!(response, "# PREDICATES");
        assert_eq!(model.token_usage().queries, 1);
    }

    #[tokio::test]
    async fn test_failure_is_request_failed() {
        let model = CommandModel::new("echo quota exceeded >&2; exit 1");
        match model.query("p").await {
            Err(ModelError::RequestFailed(msg)) => assert!(msg.contains("quota exceeded")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout() {
        let model = CommandModel::new("sleep 5").with_timeout(Some(Duration::from_secs(1)));
        assert!(matches!(model.query("p").await, Err(ModelError::Timeout(1))));
    }
}

//! Replay model: answers from a fixed list of responses.
//!
//! Used to re-run saved `.llm_response.txt` files through the pipeline.

use async_trait::async_trait;
use nl2plan_application::ports::language_model::{LanguageModel, ModelError, TokenUsage};
use std::sync::Mutex;
use tracing::debug;

/// Cycles through its responses, one per query.
pub struct CannedModel {
    name: String,
    responses: Vec<String>,
    cursor: Mutex<usize>,
    usage: Mutex<TokenUsage>,
}

impl CannedModel {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            name: "canned".to_string(),
            responses,
            cursor: Mutex::new(0),
            usage: Mutex::new(TokenUsage::default()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl LanguageModel for CannedModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query(&self, prompt: &str) -> Result<String, ModelError> {
        if self.responses.is_empty() {
            return Err(ModelError::Exhausted);
        }
        let index = {
            let mut cursor = self
                .cursor
                .lock()
                .map_err(|_| ModelError::Other("cursor lock poisoned".into()))?;
            let index = *cursor % self.responses.len();
            *cursor += 1;
            index
        };
        debug!("Replaying canned response {}/{}", index + 1, self.responses.len());

        let response = self.responses[index].clone();
        if let Ok(mut usage) = self.usage.lock() {
            usage.record(prompt, &response);
        }
        Ok(response)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cycles_through_responses() {
        let model = CannedModel::new(vec!["first".into(), "second".into()]);
        assert_eq!(model.query("p").await.unwrap(), "first");
        assert_eq!(model.query("p").await.unwrap(), "second");
        assert_eq!(model.query("p").await.unwrap(), "first");
    }

    #[tokio::test]
    async fn test_empty_is_exhausted() {
        let model = CannedModel::new(vec![]);
        assert!(matches!(model.query("p").await, Err(ModelError::Exhausted)));
    }

    #[tokio::test]
    async fn test_token_usage_resets() {
        let model = CannedModel::new(vec!["two words".into()]);
        model.query("one").await.unwrap();
        assert_eq!(model.token_usage().total(), 3);
        model.reset_tokens();
        assert_eq!(model.token_usage(), TokenUsage::default());
    }
}

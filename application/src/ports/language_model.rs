//! Language model port
//!
//! Defines the text-in/text-out interface the assembler queries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while querying a model
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("No more responses available")]
    Exhausted,

    #[error("Other error: {0}")]
    Other(String),
}

/// Approximate usage counters since the last reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub queries: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Count one exchange, using whitespace-separated words as tokens.
    pub fn record(&mut self, prompt: &str, response: &str) {
        self.queries += 1;
        self.input_tokens += prompt.split_whitespace().count() as u64;
        self.output_tokens += response.split_whitespace().count() as u64;
    }

    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// A model the assembler can query.
///
/// Hosted, local and canned implementations are interchangeable; the
/// assembler only sees this trait. Implementations live in the
/// infrastructure layer.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Human-readable identifier used in logs
    fn name(&self) -> &str;

    /// Send one prompt and return the raw response text
    async fn query(&self, prompt: &str) -> Result<String, ModelError>;

    /// Clear the usage counters
    fn reset_tokens(&self);

    /// Usage since the last [`reset_tokens`](Self::reset_tokens)
    fn token_usage(&self) -> TokenUsage;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_usage_record() {
        let mut usage = TokenUsage::default();
        usage.record("describe the blocks", "# TYPES\n## OUTPUT");
        usage.record("again", "");
        assert_eq!(usage.queries, 2);
        assert_eq!(usage.input_tokens, 4);
        assert_eq!(usage.output_tokens, 4);
        assert_eq!(usage.total(), 8);
    }
}

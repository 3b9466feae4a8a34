//! Extraction parameters: retry loop control.
//!
//! [`ExtractionParams`] groups the static parameters of the retry loop in
//! [`ModelAssembler`](crate::use_cases::assemble_model::ModelAssembler).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry loop control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionParams {
    /// Maximum number of query+parse attempts.
    pub max_retries: usize,
    /// Fixed pause between attempts.
    pub retry_delay: Duration,
}

impl Default for ExtractionParams {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_secs(2),
        }
    }
}

impl ExtractionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_retries(mut self, max: usize) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Same retry count, no pause between attempts.
    pub fn immediate(self) -> Self {
        self.with_retry_delay(Duration::ZERO)
    }
}

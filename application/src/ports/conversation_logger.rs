//! Port for structured conversation logging.
//!
//! Records every prompt, response and failed extraction attempt as a
//! machine-readable transcript (JSONL in the infrastructure adapter).
//! `tracing` still carries the human-readable diagnostics.

use serde_json::Value;

/// Event type names written by the use cases.
pub mod events {
    pub const PROMPT: &str = "prompt";
    pub const RESPONSE: &str = "llm_response";
    pub const ATTEMPT_FAILED: &str = "extraction_attempt_failed";
    pub const PARSE_ISSUE: &str = "parse_issue";
    pub const RUN_FINISHED: &str = "run_finished";
}

/// A structured conversation event.
///
/// The adapter adds the timestamp when the event is written.
#[derive(Debug, Clone)]
pub struct ConversationEvent {
    /// Event type identifier, one of [`events`].
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging conversation events.
///
/// `log` is synchronous and infallible; write failures are dropped by the
/// adapter so the pipeline never stops on logging.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}

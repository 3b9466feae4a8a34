//! Language model configuration from TOML (`[model]` section)

use nl2plan_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Which language model adapter to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModelKind {
    /// Replay fixed responses
    #[default]
    Canned,
    /// Pipe the prompt to an external command
    Command,
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "canned" | "replay" => Ok(ModelKind::Canned),
            "command" | "cmd" => Ok(ModelKind::Command),
            _ => Err(format!("Invalid model kind: {}", s)),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Canned => write!(f, "canned"),
            ModelKind::Command => write!(f, "command"),
        }
    }
}

/// Raw language model configuration from TOML
///
/// # Example
///
/// ```toml
/// [model]
/// kind = "command"                       # "canned" or "command"
/// command = "llm -m gpt-4o"              # prompt on stdin, response on stdout
/// timeout_secs = 300
///
/// # kind = "canned"
/// # response_files = ["fixtures/blocks.md"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    pub kind: String,
    /// Display name used in logs
    pub name: Option<String>,
    /// Canned: inline responses, replayed in order
    pub responses: Vec<String>,
    /// Canned: responses read from files, after the inline ones
    pub response_files: Vec<PathBuf>,
    /// Command: shell command line
    pub command: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            kind: "canned".to_string(),
            name: None,
            responses: Vec::new(),
            response_files: Vec::new(),
            command: None,
            timeout_secs: None,
        }
    }
}

impl FileModelConfig {
    /// Parse kind string into ModelKind, returning an error issue on failure.
    pub fn parse_kind(&self) -> (ModelKind, Vec<ConfigIssue>) {
        match self.kind.parse::<ModelKind>() {
            Ok(kind) => (kind, vec![]),
            Err(_) => {
                let issue = ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "model.kind".to_string(),
                        value: self.kind.clone(),
                        valid_values: vec!["canned".to_string(), "command".to_string()],
                    },
                    format!("model.kind: unknown value '{}'", self.kind),
                );
                (ModelKind::default(), vec![issue])
            }
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let (kind, mut issues) = self.parse_kind();
        match kind {
            ModelKind::Command
                if self.command.as_deref().is_none_or(|c| c.trim().is_empty()) =>
            {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyValue {
                        field: "model.command".to_string(),
                    },
                    "model.command must be set when model.kind is 'command'",
                ));
            }
            ModelKind::Canned if self.responses.is_empty() && self.response_files.is_empty() => {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::EmptyValue {
                        field: "model.responses".to_string(),
                    },
                    "canned model has no responses; every extraction attempt will fail",
                ));
            }
            _ => {}
        }
        issues
    }
}

//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Where run and batch artifacts go
    pub directory: PathBuf,
    /// Keep the raw model response next to the rendered files
    pub save_response: bool,
    /// JSONL transcript of prompts, responses and outcomes
    pub conversation_log: Option<PathBuf>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("results"),
            save_response: true,
            conversation_log: None,
            color: true,
        }
    }
}

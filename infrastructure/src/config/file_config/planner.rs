//! Planner configuration from TOML (`[planner]` section)

use nl2plan_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw planner configuration from TOML
///
/// # Example
///
/// ```toml
/// [planner]
/// command = "fast-downward.py --alias lama-first {domain} {problem}"
/// no_plan_markers = ["Search stopped without finding a solution"]
/// timeout_secs = 120
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePlannerConfig {
    /// Command line; `{domain}` and `{problem}` are replaced by file paths
    pub command: String,
    /// Output fragments meaning the planner proved there is no plan
    pub no_plan_markers: Vec<String>,
    pub timeout_secs: Option<u64>,
}

impl Default for FilePlannerConfig {
    fn default() -> Self {
        Self {
            command: String::new(),
            no_plan_markers: vec![
                "no solution".to_string(),
                "unsolvable".to_string(),
                "no plan".to_string(),
            ],
            timeout_secs: None,
        }
    }
}

impl FilePlannerConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        if self.command.trim().is_empty() {
            return vec![ConfigIssue::error(
                ConfigIssueCode::EmptyValue {
                    field: "planner.command".to_string(),
                },
                "planner.command must be set",
            )];
        }
        vec![]
    }
}

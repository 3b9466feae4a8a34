//! Extraction configuration from TOML (`[extraction]` section)

use nl2plan_application::{ExtractionParams, TASK_PLACEHOLDER};
use nl2plan_domain::extract_bracket_block;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Raw extraction configuration from TOML
///
/// # Example
///
/// ```toml
/// [extraction]
/// max_retries = 3
/// retry_delay_ms = 2000
/// template_file = "prompts/pddl.txt"   # takes precedence over `template`
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExtractionConfig {
    pub max_retries: usize,
    pub retry_delay_ms: u64,
    /// Inline prompt template containing `{task_desc}`
    pub template: Option<String>,
    /// Prompt template read from a file
    pub template_file: Option<PathBuf>,
}

impl Default for FileExtractionConfig {
    fn default() -> Self {
        let params = ExtractionParams::default();
        Self {
            max_retries: params.max_retries,
            retry_delay_ms: params.retry_delay.as_millis() as u64,
            template: None,
            template_file: None,
        }
    }
}

impl FileExtractionConfig {
    pub fn to_params(&self) -> ExtractionParams {
        ExtractionParams::default()
            .with_max_retries(self.max_retries)
            .with_retry_delay(Duration::from_millis(self.retry_delay_ms))
    }

    /// The prompt template: `template_file`, then `template`, then the bare
    /// placeholder. Bracket-tagged templates go through [`compose_template`].
    pub fn load_template(&self) -> std::io::Result<String> {
        let raw = match (&self.template_file, &self.template) {
            (Some(path), _) => read_template(path)?,
            (None, Some(template)) => template.clone(),
            (None, None) => return Ok(TASK_PLACEHOLDER.to_string()),
        };
        Ok(compose_template(&raw))
    }
}

/// Flatten a `[ROLE]` / `[TEMPLATE]` tagged template into one prompt.
///
/// Without a `[TEMPLATE]` block the text is returned unchanged.
fn compose_template(raw: &str) -> String {
    let template = extract_bracket_block(raw, "TEMPLATE");
    if template.is_empty() {
        return raw.to_string();
    }
    let role = extract_bracket_block(raw, "ROLE");
    if role.is_empty() {
        template
    } else {
        format!("{}\n\n{}", role, template)
    }
}

fn read_template(path: &Path) -> std::io::Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("cannot read prompt template {}: {}", path.display(), e),
        )
    })
}

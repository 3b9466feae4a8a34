//! Command-backed planner.
//!
//! Runs an external planner binary on the rendered files. The command line
//! is a template: `{domain}` and `{problem}` are replaced by the shell-quoted
//! file paths. Stdout is taken as the plan.

use crate::process::{run_shell, shell_quote, ProcessError};
use async_trait::async_trait;
use nl2plan_application::ports::planner::{Planner, PlannerError};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub const DOMAIN_PLACEHOLDER: &str = "{domain}";
pub const PROBLEM_PLACEHOLDER: &str = "{problem}";

pub struct CommandPlanner {
    name: String,
    command: String,
    no_plan_markers: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandPlanner {
    pub fn new(command: impl Into<String>) -> Self {
        let command = command.into();
        let name = command
            .split_whitespace()
            .next()
            .unwrap_or("planner")
            .to_string();
        Self {
            name,
            command,
            no_plan_markers: Vec::new(),
            timeout: None,
        }
    }

    /// Output fragments (case-insensitive) that mean "proved unsolvable".
    pub fn with_no_plan_markers(mut self, markers: Vec<String>) -> Self {
        self.no_plan_markers = markers.into_iter().map(|m| m.to_lowercase()).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The command line with both placeholders filled.
    pub fn command_line(&self, domain_path: &Path, problem_path: &Path) -> String {
        self.command
            .replace(
                DOMAIN_PLACEHOLDER,
                &shell_quote(&domain_path.display().to_string()),
            )
            .replace(
                PROBLEM_PLACEHOLDER,
                &shell_quote(&problem_path.display().to_string()),
            )
    }

    fn no_plan_marker(&self, output: &str) -> Option<&str> {
        let output = output.to_lowercase();
        self.no_plan_markers
            .iter()
            .find(|marker| output.contains(marker.as_str()))
            .map(String::as_str)
    }
}

#[async_trait]
impl Planner for CommandPlanner {
    fn name(&self) -> &str {
        &self.name
    }

    async fn solve(&self, domain_path: &Path, problem_path: &Path) -> Result<String, PlannerError> {
        let command_line = self.command_line(domain_path, problem_path);
        info!("Running planner: {}", command_line);

        let output = run_shell(&command_line, None, self.timeout)
            .await
            .map_err(|e| match e {
                ProcessError::Timeout { secs, .. } => PlannerError::Timeout(secs),
                ProcessError::Spawn { source, .. } => PlannerError::Launch(source),
                other => PlannerError::Failed(other.to_string()),
            })?;
        debug!(
            "Planner exited with code {} ({} bytes of output)",
            output.exit_code(),
            output.stdout.len()
        );

        if let Some(marker) = self.no_plan_marker(&output.combined()) {
            return Err(PlannerError::NoPlan(format!(
                "planner output contains '{}'",
                marker
            )));
        }
        if !output.success() {
            return Err(PlannerError::Failed(format!(
                "exit code {}: {}",
                output.exit_code(),
                output.stderr.trim()
            )));
        }

        let plan = output.stdout.trim();
        if plan.is_empty() {
            return Err(PlannerError::NoPlan("planner printed no plan".to_string()));
        }
        Ok(plan.to_string())
    }
}

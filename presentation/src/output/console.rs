//! Console output formatter for run and batch results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use nl2plan_application::use_cases::run_batch::outcome_counts;
use nl2plan_application::{ArtifactPaths, BatchSummary, OutcomeCode, RunOutcome};
use nl2plan_domain::{ConfigIssue, Severity};

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a single run
    pub fn format_outcome(outcome: &RunOutcome, paths: &ArtifactPaths) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("nl2plan Run"));
        output.push('\n');
        output.push_str(&format!(
            "{} {}\n",
            "Outcome:".cyan().bold(),
            Self::code_label(outcome.code)
        ));
        output.push_str(&format!(
            "{} {} queries, ~{} tokens\n",
            "Model usage:".cyan().bold(),
            outcome.token_usage.queries,
            outcome.token_usage.total()
        ));

        output.push_str(&Self::section_header("Artifacts"));
        let mut files = vec![("domain", &paths.domain), ("problem", &paths.problem)];
        if let Some(response) = &paths.response {
            files.push(("response", response));
        }
        if outcome.is_success() {
            files.push(("plan", &paths.plan));
        }
        for (label, path) in files {
            output.push_str(&format!("  {:<9}{}\n", label, path.display()));
        }

        if let Some(plan) = &outcome.plan {
            output.push_str(&Self::section_header("Plan"));
            output.push_str(&Self::indent(plan, "  "));
            output.push('\n');
        }

        if !outcome.trace.is_empty() {
            output.push_str(&Self::section_header("Error"));
            output.push_str(&Self::indent(&outcome.trace, "  ").red().to_string());
            output.push('\n');
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format a single run as JSON
    pub fn format_outcome_json(outcome: &RunOutcome, paths: &ArtifactPaths) -> String {
        let value = serde_json::json!({
            "code": outcome.code.code(),
            "outcome": outcome.code.description(),
            "trace": outcome.trace,
            "plan": outcome.plan,
            "token_usage": outcome.token_usage,
            "domain": paths.domain.display().to_string(),
            "problem": paths.problem.display().to_string(),
            "response": paths.response.as_ref().map(|p| p.display().to_string()),
            "plan_file": paths.plan.display().to_string(),
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format a batch summary
    pub fn format_summary(summary: &BatchSummary) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("nl2plan Batch Results"));
        output.push('\n');
        output.push_str(&format!(
            "{} {} total, {} run, {} skipped\n",
            "Tasks:".cyan().bold(),
            summary.total,
            summary.processed(),
            summary.skipped
        ));
        output.push_str(&format!(
            "{} {:.1}% ({} of {})\n",
            "Success rate:".cyan().bold(),
            summary.success_rate() * 100.0,
            summary.successful,
            summary.processed()
        ));

        let counts = outcome_counts(summary);
        if !counts.is_empty() {
            output.push_str(&Self::section_header("By outcome"));
            for (code, count) in counts {
                output.push_str(&format!("  {:<4} {}\n", count, Self::code_label(code)));
            }
        }

        let failures: Vec<_> = summary.tasks.iter().filter(|t| t.code != 0).collect();
        if !failures.is_empty() {
            output.push_str(&Self::section_header("Failed tasks"));
            for task in failures {
                let first_line = task.trace.lines().next().unwrap_or_default();
                output.push_str(&format!(
                    "  {} [{}] {}\n",
                    task.name.yellow(),
                    task.code,
                    first_line.dimmed()
                ));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format a batch summary as JSON
    pub fn format_summary_json(summary: &BatchSummary) -> String {
        serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format configuration issues, errors first
    pub fn format_issues(issues: &[ConfigIssue]) -> String {
        let mut sorted: Vec<_> = issues.iter().collect();
        sorted.sort_by_key(|i| i.severity != Severity::Error);
        sorted
            .into_iter()
            .map(|issue| match issue.severity {
                Severity::Error => format!("{} {}", "error:".red().bold(), issue.message),
                Severity::Warning => format!("{} {}", "warning:".yellow().bold(), issue.message),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn code_label(code: OutcomeCode) -> String {
        let label = code.to_string();
        if code.is_success() {
            label.green().bold().to_string()
        } else {
            label.red().bold().to_string()
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_outcome(&self, outcome: &RunOutcome, paths: &ArtifactPaths) -> String {
        Self::format_outcome(outcome, paths)
    }

    fn format_outcome_json(&self, outcome: &RunOutcome, paths: &ArtifactPaths) -> String {
        Self::format_outcome_json(outcome, paths)
    }

    fn format_summary(&self, summary: &BatchSummary) -> String {
        Self::format_summary(summary)
    }

    fn format_summary_json(&self, summary: &BatchSummary) -> String {
        Self::format_summary_json(summary)
    }
}

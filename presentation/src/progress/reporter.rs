//! Progress reporting for pipeline runs and batches

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use nl2plan_application::{OutcomeCode, PipelinePhase, PipelineProgress};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with a spinner per phase
pub struct ProgressReporter {
    phase_bar: Mutex<Option<ProgressBar>>,
    task_prefix: Mutex<String>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            phase_bar: Mutex::new(None),
            task_prefix: Mutex::new(String::new()),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    pub(crate) fn phase_display_name(phase: PipelinePhase) -> &'static str {
        match phase {
            PipelinePhase::Extract => "Extracting model",
            PipelinePhase::Render => "Rendering definitions",
            PipelinePhase::Save => "Saving artifacts",
            PipelinePhase::Plan => "Running planner",
        }
    }

    fn prefix(&self) -> String {
        self.task_prefix
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineProgress for ProgressReporter {
    fn on_phase_start(&self, phase: PipelinePhase) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(self.prefix());
        pb.set_message(format!("{}...", Self::phase_display_name(phase)));
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut slot) = self.phase_bar.lock()
            && let Some(previous) = slot.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_phase_complete(&self, phase: PipelinePhase, success: bool) {
        let Ok(mut slot) = self.phase_bar.lock() else {
            return;
        };
        if let Some(pb) = slot.take() {
            let name = Self::phase_display_name(phase);
            if success {
                pb.finish_with_message(format!("{} {}", "v".green(), name));
            } else {
                pb.finish_with_message(format!("{} {}", "x".red(), name));
            }
        }
    }

    fn on_retry(&self, attempt: usize, max_attempts: usize, error: &str) {
        if let Ok(slot) = self.phase_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let first_line = error.lines().next().unwrap_or_default();
            pb.set_message(format!(
                "{} {}",
                format!("attempt {}/{} failed:", attempt, max_attempts).yellow(),
                first_line
            ));
        }
    }

    fn on_task_start(&self, name: &str, index: usize, total: usize) {
        if let Ok(mut prefix) = self.task_prefix.lock() {
            *prefix = format!("[{}/{}] {}", index, total, name);
        }
    }

    fn on_task_skipped(&self, name: &str) {
        eprintln!("{} {} (already done)", "-".dimmed(), name.dimmed());
    }

    fn on_task_complete(&self, name: &str, code: OutcomeCode) {
        if code.is_success() {
            eprintln!("{} {}", "v".green(), name);
        } else {
            eprintln!("{} {} {}", "x".red(), name, code.to_string().red());
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl PipelineProgress for SimpleProgress {
    fn on_phase_start(&self, phase: PipelinePhase) {
        eprintln!(
            "{} {}",
            "->".cyan(),
            ProgressReporter::phase_display_name(phase).bold()
        );
    }

    fn on_phase_complete(&self, phase: PipelinePhase, success: bool) {
        if !success {
            eprintln!("  {} {} failed", "x".red(), phase);
        }
    }

    fn on_retry(&self, attempt: usize, max_attempts: usize, error: &str) {
        eprintln!(
            "  {} attempt {}/{}: {}",
            "!".yellow(),
            attempt,
            max_attempts,
            error.lines().next().unwrap_or_default()
        );
    }

    fn on_task_start(&self, name: &str, index: usize, total: usize) {
        eprintln!("{} [{}/{}] {}", "==".cyan(), index, total, name.bold());
    }

    fn on_task_skipped(&self, name: &str) {
        eprintln!("{} {} (already done)", "--".dimmed(), name);
    }

    fn on_task_complete(&self, name: &str, code: OutcomeCode) {
        eprintln!("  {} {}", name, code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_names_are_distinct() {
        let names: std::collections::HashSet<_> = [
            PipelinePhase::Extract,
            PipelinePhase::Render,
            PipelinePhase::Save,
            PipelinePhase::Plan,
        ]
        .into_iter()
        .map(ProgressReporter::phase_display_name)
        .collect();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn test_task_prefix_tracks_batch_position() {
        let reporter = ProgressReporter::new();
        reporter.on_task_start("t2", 2, 5);
        assert_eq!(reporter.prefix(), "[2/5] t2");
    }

    #[test]
    fn test_phase_lifecycle_clears_bar() {
        let reporter = ProgressReporter::new();
        reporter.on_phase_start(PipelinePhase::Extract);
        reporter.on_retry(1, 3, "Could not find the 'PREDICATES' section");
        reporter.on_phase_complete(PipelinePhase::Extract, true);
        assert!(reporter.phase_bar.lock().unwrap().is_none());
    }
}

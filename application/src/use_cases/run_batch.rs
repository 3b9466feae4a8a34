//! Run Batch use case.
//!
//! Runs a [`PlanningAgent`] over a list of named tasks. Each task gets its
//! own directory under the output root; a task whose directory already
//! exists is skipped so an interrupted batch can be resumed. The summary
//! file is rewritten after every task.

use crate::ports::artifact_store::{ArtifactError, ArtifactStore};
use crate::ports::progress::PipelineProgress;
use crate::use_cases::run_pipeline::{ArtifactPaths, OutcomeCode, PlanningAgent, RunOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// File name of the batch summary inside the output root.
pub const SUMMARY_FILE: &str = "results_summary.json";

/// One named task description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchTask {
    pub name: String,
    pub description: String,
}

impl BatchTask {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Per-task line of the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub name: String,
    pub code: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub trace: String,
}

/// Aggregate results of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Count per outcome code.
    pub by_code: BTreeMap<i32, usize>,
    pub tasks: Vec<TaskRecord>,
    pub updated_at: DateTime<Utc>,
}

impl BatchSummary {
    fn new(total: usize) -> Self {
        Self {
            total,
            successful: 0,
            failed: 0,
            skipped: 0,
            by_code: BTreeMap::new(),
            tasks: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    fn record(&mut self, name: &str, outcome: &RunOutcome) {
        if outcome.is_success() {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
        *self.by_code.entry(outcome.code.code()).or_default() += 1;
        self.tasks.push(TaskRecord {
            name: name.to_string(),
            code: outcome.code.code(),
            trace: outcome.trace.clone(),
        });
        self.updated_at = Utc::now();
    }

    /// Tasks actually run.
    pub fn processed(&self) -> usize {
        self.successful + self.failed
    }

    pub fn success_rate(&self) -> f64 {
        if self.processed() == 0 {
            0.0
        } else {
            self.successful as f64 / self.processed() as f64
        }
    }
}

/// Content of a task's `.log.txt`.
pub fn execution_log(outcome: &RunOutcome) -> String {
    if outcome.is_success() {
        format!(
            "Execution Flag: {}\nTask executed successfully.",
            outcome.code.code()
        )
    } else {
        format!(
            "Execution Flag: {}\nError in task execution: {}",
            outcome.code.code(),
            outcome.trace
        )
    }
}

/// Use case for running many tasks in sequence.
pub struct BatchRunner {
    agent: Arc<PlanningAgent>,
    store: Arc<dyn ArtifactStore>,
}

impl BatchRunner {
    pub fn new(agent: Arc<PlanningAgent>, store: Arc<dyn ArtifactStore>) -> Self {
        Self { agent, store }
    }

    /// Directory a task writes into.
    pub fn task_dir(output_root: &Path, name: &str) -> PathBuf {
        output_root.join(name)
    }

    /// Run every task, returning the final summary.
    ///
    /// Task failures are recorded, not returned; only a failure to persist
    /// the summary ends the batch early.
    pub async fn run(
        &self,
        tasks: &[BatchTask],
        output_root: &Path,
        progress: &dyn PipelineProgress,
    ) -> Result<BatchSummary, ArtifactError> {
        let mut summary = BatchSummary::new(tasks.len());
        let dialect = self.agent.dialect();
        let summary_path = output_root.join(SUMMARY_FILE);

        info!(
            "Running {} task(s) into {}",
            tasks.len(),
            output_root.display()
        );

        for (index, task) in tasks.iter().enumerate() {
            let dir = Self::task_dir(output_root, &task.name);
            if self.store.exists(&dir).await {
                info!("Skipping {}: {} already exists", task.name, dir.display());
                progress.on_task_skipped(&task.name);
                summary.skipped += 1;
                continue;
            }

            progress.on_task_start(&task.name, index + 1, tasks.len());
            let paths = ArtifactPaths::in_dir(&dir, &task.name, dialect);
            let outcome = self.agent.run(&task.description, &paths, progress).await;

            let log_path = dir.join(format!("{}.log.txt", task.name));
            if let Err(e) = self.store.write(&log_path, &execution_log(&outcome)).await {
                warn!("Could not write execution log for {}: {}", task.name, e);
            }

            progress.on_task_complete(&task.name, outcome.code);
            summary.record(&task.name, &outcome);
            self.write_summary(&summary_path, &summary).await?;
        }

        info!(
            "Batch finished: {} succeeded, {} failed, {} skipped",
            summary.successful, summary.failed, summary.skipped
        );
        Ok(summary)
    }

    async fn write_summary(
        &self,
        path: &Path,
        summary: &BatchSummary,
    ) -> Result<(), ArtifactError> {
        let json = serde_json::to_string_pretty(summary).map_err(|e| ArtifactError::Write {
            path: path.to_path_buf(),
            source: std::io::Error::other(e),
        })?;
        self.store.write(path, &json).await
    }
}

/// Count of tasks per outcome, in code order.
pub fn outcome_counts(summary: &BatchSummary) -> Vec<(OutcomeCode, usize)> {
    summary
        .by_code
        .iter()
        .filter_map(|(code, count)| OutcomeCode::from_code(*code).map(|c| (c, *count)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use crate::use_cases::assemble_model::tests::{FLAT_RESPONSE, ScriptedModel};
    use crate::use_cases::run_pipeline::tests::{
        config, MemoryStore, PlannerScript, StubPlanner,
    };

    fn runner(responses: &[&str], store: Arc<MemoryStore>) -> BatchRunner {
        let agent = PlanningAgent::new(
            Arc::new(ScriptedModel::texts(responses)),
            Arc::new(StubPlanner::new(PlannerScript::Plan("(stack a b)"))),
            store.clone(),
            config(),
        );
        BatchRunner::new(Arc::new(agent), store)
    }

    fn tasks() -> Vec<BatchTask> {
        vec![
            BatchTask::new("t1", "stack a on b"),
            BatchTask::new("t2", "stack b on a"),
        ]
    }

    #[tokio::test]
    async fn test_batch_records_every_task() {
        let store = Arc::new(MemoryStore::default());
        // t1 succeeds, t2 exhausts both attempts
        let runner = runner(&[FLAT_RESPONSE, "junk", "junk"], store.clone());
        let root = Path::new("results");

        let summary = runner.run(&tasks(), root, &NoProgress).await.unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.successful, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.by_code.get(&0), Some(&1));
        assert_eq!(summary.by_code.get(&1), Some(&1));
        assert_eq!(
            outcome_counts(&summary),
            vec![(OutcomeCode::Success, 1), (OutcomeCode::ExtractionFailed, 1)]
        );

        assert!(store.get(Path::new("results/t1/t1.domain.pddl")).is_some());
        assert_eq!(
            store.get(Path::new("results/t1/t1.log.txt")).as_deref(),
            Some("Execution Flag: 0\nTask executed successfully.")
        );
        let failed_log = store.get(Path::new("results/t2/t2.log.txt")).unwrap();
        assert!(failed_log.starts_with("Execution Flag: 1\nError in task execution: Max retries"));

        let persisted: BatchSummary =
            serde_json::from_str(&store.get(&root.join(SUMMARY_FILE)).unwrap()).unwrap();
        assert_eq!(persisted, summary);
    }

    #[tokio::test]
    async fn test_existing_task_dir_is_skipped() {
        let store = Arc::new(MemoryStore {
            existing: vec![PathBuf::from("results/t1")],
            ..Default::default()
        });
        let runner = runner(&[FLAT_RESPONSE], store.clone());

        let summary = runner
            .run(&tasks(), Path::new("results"), &NoProgress)
            .await
            .unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.successful, 1);
        assert_eq!(summary.tasks.len(), 1);
        assert_eq!(summary.tasks[0].name, "t2");
        assert!(store.get(Path::new("results/t1/t1.log.txt")).is_none());
    }

    #[tokio::test]
    async fn test_summary_write_failure_stops_batch() {
        let store = Arc::new(MemoryStore {
            fail_on: vec![PathBuf::from("results").join(SUMMARY_FILE)],
            ..Default::default()
        });
        let runner = runner(&[FLAT_RESPONSE, FLAT_RESPONSE], store.clone());

        let result = runner.run(&tasks(), Path::new("results"), &NoProgress).await;

        assert!(matches!(result, Err(ArtifactError::Write { .. })));
        assert!(store.get(Path::new("results/t2/t2.log.txt")).is_none());
    }

    #[test]
    fn test_success_rate() {
        let mut summary = BatchSummary::new(0);
        assert_eq!(summary.success_rate(), 0.0);
        summary.successful = 3;
        summary.failed = 1;
        assert_eq!(summary.success_rate(), 0.75);
    }
}

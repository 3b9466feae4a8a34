//! Run Pipeline use case.
//!
//! [`PlanningAgent`] drives one task description through four phases:
//! extract, render, save and plan. The first failing phase ends the run
//! with a numeric [`OutcomeCode`] so batch callers can tabulate failures
//! without inspecting error types.

use crate::config::PipelineConfig;
use crate::ports::artifact_store::{ArtifactError, ArtifactStore};
use crate::ports::conversation_logger::{
    events, ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::language_model::{LanguageModel, TokenUsage};
use crate::ports::planner::{Planner, PlannerError};
use crate::ports::progress::PipelineProgress;
use crate::use_cases::assemble_model::ModelAssembler;
use nl2plan_domain::Dialect;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// The phases of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelinePhase {
    Extract,
    Render,
    Save,
    Plan,
}

impl PipelinePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelinePhase::Extract => "extract",
            PipelinePhase::Render => "render",
            PipelinePhase::Save => "save",
            PipelinePhase::Plan => "plan",
        }
    }
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result classification of one run.
///
/// | Code | Meaning |
/// |------|---------|
/// | 0  | plan found and saved |
/// | 1  | extraction retries exhausted |
/// | 2  | rendering failed |
/// | -1 | an artifact could not be written |
/// | 3  | the planner raised |
/// | 4  | the planner found no plan |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeCode {
    Success,
    ExtractionFailed,
    RenderFailed,
    ArtifactWriteFailed,
    PlannerFailed,
    NoPlanFound,
}

impl OutcomeCode {
    pub const ALL: [OutcomeCode; 6] = [
        OutcomeCode::ArtifactWriteFailed,
        OutcomeCode::Success,
        OutcomeCode::ExtractionFailed,
        OutcomeCode::RenderFailed,
        OutcomeCode::PlannerFailed,
        OutcomeCode::NoPlanFound,
    ];

    pub fn code(&self) -> i32 {
        match self {
            OutcomeCode::ArtifactWriteFailed => -1,
            OutcomeCode::Success => 0,
            OutcomeCode::ExtractionFailed => 1,
            OutcomeCode::RenderFailed => 2,
            OutcomeCode::PlannerFailed => 3,
            OutcomeCode::NoPlanFound => 4,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OutcomeCode::Success)
    }

    pub fn description(&self) -> &'static str {
        match self {
            OutcomeCode::Success => "plan found",
            OutcomeCode::ExtractionFailed => "error in extraction",
            OutcomeCode::RenderFailed => "error in processing",
            OutcomeCode::ArtifactWriteFailed => "error writing artifacts",
            OutcomeCode::PlannerFailed => "error in planning",
            OutcomeCode::NoPlanFound => "plan unsolvable",
        }
    }
}

impl fmt::Display for OutcomeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.description())
    }
}

/// Where a run writes its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub domain: PathBuf,
    pub problem: PathBuf,
    pub plan: PathBuf,
    /// Raw model response; `None` skips saving it.
    pub response: Option<PathBuf>,
}

impl ArtifactPaths {
    /// `<dir>/<name>.domain.<ext>`, `.problem.<ext>`, `.plan.txt` and
    /// `.llm_response.txt`, with `ext` taken from the dialect.
    pub fn in_dir(dir: &Path, name: &str, dialect: Dialect) -> Self {
        let ext = dialect.file_extension();
        Self {
            domain: dir.join(format!("{}.domain.{}", name, ext)),
            problem: dir.join(format!("{}.problem.{}", name, ext)),
            plan: dir.join(format!("{}.plan.txt", name)),
            response: Some(dir.join(format!("{}.llm_response.txt", name))),
        }
    }

    pub fn without_response(mut self) -> Self {
        self.response = None;
        self
    }
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub code: OutcomeCode,
    /// Human-readable error chain; empty on success.
    pub trace: String,
    pub plan: Option<String>,
    pub token_usage: TokenUsage,
}

impl RunOutcome {
    fn success(plan: String, token_usage: TokenUsage) -> Self {
        Self {
            code: OutcomeCode::Success,
            trace: String::new(),
            plan: Some(plan),
            token_usage,
        }
    }

    fn failure(code: OutcomeCode, trace: String, token_usage: TokenUsage) -> Self {
        Self {
            code,
            trace,
            plan: None,
            token_usage,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }
}

/// Render an error and its sources, outermost first.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut trace = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        trace.push_str("\ncaused by: ");
        trace.push_str(&cause.to_string());
        source = cause.source();
    }
    trace
}

/// Use case that turns one task description into a plan.
pub struct PlanningAgent {
    model: Arc<dyn LanguageModel>,
    planner: Arc<dyn Planner>,
    store: Arc<dyn ArtifactStore>,
    config: PipelineConfig,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl PlanningAgent {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        planner: Arc<dyn Planner>,
        store: Arc<dyn ArtifactStore>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            model,
            planner,
            store,
            config,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn dialect(&self) -> Dialect {
        self.config.resolved_dialect()
    }

    /// Run every phase; never fails, the outcome carries the failure.
    pub async fn run(
        &self,
        task_description: &str,
        paths: &ArtifactPaths,
        progress: &dyn PipelineProgress,
    ) -> RunOutcome {
        let outcome = self.run_phases(task_description, paths, progress).await;

        if outcome.is_success() {
            info!("Run finished: {}", outcome.code);
        } else {
            error!("Run failed with code {}: {}", outcome.code, outcome.trace);
        }
        self.conversation_logger.log(ConversationEvent::new(
            events::RUN_FINISHED,
            serde_json::json!({
                "code": outcome.code.code(),
                "trace": outcome.trace,
                "domain_path": paths.domain.display().to_string(),
                "problem_path": paths.problem.display().to_string(),
            }),
        ));
        outcome
    }

    async fn run_phases(
        &self,
        task_description: &str,
        paths: &ArtifactPaths,
        progress: &dyn PipelineProgress,
    ) -> RunOutcome {
        let usage = || self.model.token_usage();

        // Extract
        progress.on_phase_start(PipelinePhase::Extract);
        let mut assembler = ModelAssembler::new(self.config.header())
            .with_conversation_logger(self.conversation_logger.clone());
        let extracted = assembler
            .extract_with_progress(
                self.model.as_ref(),
                task_description,
                &self.config.template,
                &self.config.extraction,
                progress,
            )
            .await;
        progress.on_phase_complete(PipelinePhase::Extract, extracted.is_ok());
        let response = match extracted {
            Ok(response) => response,
            Err(e) => {
                return RunOutcome::failure(
                    OutcomeCode::ExtractionFailed,
                    error_chain(&e),
                    usage(),
                );
            }
        };

        // Render
        progress.on_phase_start(PipelinePhase::Render);
        let dialect = Some(self.dialect());
        let rendered = assembler
            .render_domain(dialect)
            .and_then(|domain| Ok((domain, assembler.render_problem(dialect)?)));
        progress.on_phase_complete(PipelinePhase::Render, rendered.is_ok());
        let (domain, problem) = match rendered {
            Ok(pair) => pair,
            Err(e) => {
                return RunOutcome::failure(OutcomeCode::RenderFailed, error_chain(&e), usage());
            }
        };

        // Save
        progress.on_phase_start(PipelinePhase::Save);
        let saved = self.save_model(paths, &domain, &problem, &response).await;
        progress.on_phase_complete(PipelinePhase::Save, saved.is_ok());
        if let Err(e) = saved {
            return RunOutcome::failure(OutcomeCode::ArtifactWriteFailed, error_chain(&e), usage());
        }

        // Plan
        progress.on_phase_start(PipelinePhase::Plan);
        info!("Solving with {}", self.planner.name());
        let solved = self.planner.solve(&paths.domain, &paths.problem).await;
        progress.on_phase_complete(PipelinePhase::Plan, solved.is_ok());
        let plan = match solved {
            Ok(plan) => plan,
            Err(e) => {
                let code = match e {
                    PlannerError::NoPlan(_) => OutcomeCode::NoPlanFound,
                    _ => OutcomeCode::PlannerFailed,
                };
                return RunOutcome::failure(code, error_chain(&e), usage());
            }
        };

        if let Err(e) = self.store.write(&paths.plan, &plan).await {
            return RunOutcome::failure(OutcomeCode::ArtifactWriteFailed, error_chain(&e), usage());
        }

        RunOutcome::success(plan, usage())
    }

    async fn save_model(
        &self,
        paths: &ArtifactPaths,
        domain: &str,
        problem: &str,
        response: &str,
    ) -> Result<(), ArtifactError> {
        self.store.write(&paths.domain, domain).await?;
        self.store.write(&paths.problem, problem).await?;
        if self.config.save_response {
            if let Some(path) = &paths.response {
                self.store.write(path, response).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::ExtractionParams;
    use crate::ports::progress::NoProgress;
    use crate::use_cases::assemble_model::tests::{FLAT_RESPONSE, ScriptedModel};
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Keeps written files in memory; paths listed in `fail_on` refuse writes.
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        pub(crate) files: Mutex<BTreeMap<PathBuf, String>>,
        pub(crate) fail_on: Vec<PathBuf>,
        pub(crate) existing: Vec<PathBuf>,
    }

    impl MemoryStore {
        pub(crate) fn get(&self, path: &Path) -> Option<String> {
            self.files.lock().unwrap().get(path).cloned()
        }
    }

    #[async_trait]
    impl ArtifactStore for MemoryStore {
        async fn write(&self, path: &Path, contents: &str) -> Result<(), ArtifactError> {
            if self.fail_on.iter().any(|p| p == path) {
                return Err(ArtifactError::Write {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
                });
            }
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), contents.to_string());
            Ok(())
        }

        async fn exists(&self, path: &Path) -> bool {
            self.existing.iter().any(|p| p == path) || self.files.lock().unwrap().contains_key(path)
        }
    }

    pub(crate) enum PlannerScript {
        Plan(&'static str),
        NoPlan,
        Crash,
    }

    pub(crate) struct StubPlanner {
        pub(crate) script: PlannerScript,
        pub(crate) calls: Mutex<Vec<(PathBuf, PathBuf)>>,
    }

    impl StubPlanner {
        pub(crate) fn new(script: PlannerScript) -> Self {
            Self {
                script,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Planner for StubPlanner {
        fn name(&self) -> &str {
            "stub"
        }

        async fn solve(&self, domain: &Path, problem: &Path) -> Result<String, PlannerError> {
            self.calls
                .lock()
                .unwrap()
                .push((domain.to_path_buf(), problem.to_path_buf()));
            match self.script {
                PlannerScript::Plan(plan) => Ok(plan.to_string()),
                PlannerScript::NoPlan => Err(PlannerError::NoPlan("search exhausted".into())),
                PlannerScript::Crash => Err(PlannerError::Failed("syntax error in domain".into())),
            }
        }
    }

    pub(crate) fn config() -> PipelineConfig {
        PipelineConfig::new("{task_desc}")
            .with_names("blocks", "stack-two")
            .with_extraction(ExtractionParams::default().with_max_retries(2).immediate())
    }

    fn paths() -> ArtifactPaths {
        ArtifactPaths::in_dir(Path::new("out/t1"), "t1", Dialect::Pddl)
    }

    fn build_agent(
        responses: &[&str],
        planner: PlannerScript,
        store: Arc<MemoryStore>,
    ) -> (PlanningAgent, Arc<StubPlanner>) {
        let planner = Arc::new(StubPlanner::new(planner));
        let agent = PlanningAgent::new(
            Arc::new(ScriptedModel::texts(responses)),
            planner.clone(),
            store,
            config(),
        );
        (agent, planner)
    }

    #[test]
    fn test_outcome_codes() {
        assert_eq!(OutcomeCode::ArtifactWriteFailed.code(), -1);
        assert_eq!(OutcomeCode::NoPlanFound.code(), 4);
        assert_eq!(OutcomeCode::from_code(2), Some(OutcomeCode::RenderFailed));
        assert_eq!(OutcomeCode::from_code(9), None);
        assert_eq!(OutcomeCode::PlannerFailed.to_string(), "3 (error in planning)");
    }

    #[test]
    fn test_artifact_paths_layout() {
        let paths = ArtifactPaths::in_dir(Path::new("results/t1"), "t1", Dialect::Hddl);
        assert_eq!(paths.domain, Path::new("results/t1/t1.domain.hddl"));
        assert_eq!(paths.problem, Path::new("results/t1/t1.problem.hddl"));
        assert_eq!(paths.plan, Path::new("results/t1/t1.plan.txt"));
        assert_eq!(
            paths.response.as_deref(),
            Some(Path::new("results/t1/t1.llm_response.txt"))
        );
        assert!(paths.without_response().response.is_none());
    }

    #[tokio::test]
    async fn test_successful_run_writes_everything() {
        let store = Arc::new(MemoryStore::default());
        let (agent, planner) = build_agent(
            &[FLAT_RESPONSE],
            PlannerScript::Plan("(stack a b)"),
            store.clone(),
        );
        let paths = paths();

        let outcome = agent.run("stack a on b", &paths, &NoProgress).await;

        assert_eq!(outcome.code, OutcomeCode::Success);
        assert_eq!(outcome.plan.as_deref(), Some("(stack a b)"));
        assert!(outcome.trace.is_empty());
        assert!(store.get(&paths.domain).unwrap().starts_with("(define (domain blocks)"));
        assert!(store.get(&paths.problem).unwrap().contains("(problem stack-two)"));
        assert_eq!(store.get(&paths.plan).as_deref(), Some("(stack a b)"));
        assert_eq!(
            store.get(paths.response.as_ref().unwrap()).as_deref(),
            Some(FLAT_RESPONSE)
        );
        assert_eq!(
            planner.calls.lock().unwrap().as_slice(),
            [(paths.domain.clone(), paths.problem.clone())]
        );
    }

    #[tokio::test]
    async fn test_extraction_failure_short_circuits() {
        let store = Arc::new(MemoryStore::default());
        let (agent, planner) =
            build_agent(&["junk", "junk"], PlannerScript::Plan("p"), store.clone());

        let outcome = agent.run("t", &paths(), &NoProgress).await;

        assert_eq!(outcome.code, OutcomeCode::ExtractionFailed);
        assert!(outcome.trace.contains("Max retries exceeded"));
        assert!(outcome.trace.contains("caused by: Could not find the 'PREDICATES' section"));
        assert!(store.files.lock().unwrap().is_empty());
        assert!(planner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_is_minus_one() {
        let paths = paths();
        let store = Arc::new(MemoryStore {
            fail_on: vec![paths.problem.clone()],
            ..Default::default()
        });
        let (agent, planner) = build_agent(&[FLAT_RESPONSE], PlannerScript::Plan("p"), store);

        let outcome = agent.run("t", &paths, &NoProgress).await;

        assert_eq!(outcome.code.code(), -1);
        assert!(outcome.trace.contains("read-only"));
        assert!(planner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_planner_outcomes() {
        let store = Arc::new(MemoryStore::default());
        let (agent, _) = build_agent(&[FLAT_RESPONSE], PlannerScript::NoPlan, store.clone());
        let outcome = agent.run("t", &paths(), &NoProgress).await;
        assert_eq!(outcome.code, OutcomeCode::NoPlanFound);
        assert!(store.get(&paths().plan).is_none());

        let (agent, _) = build_agent(
            &[FLAT_RESPONSE],
            PlannerScript::Crash,
            Arc::new(MemoryStore::default()),
        );
        let outcome = agent.run("t", &paths(), &NoProgress).await;
        assert_eq!(outcome.code, OutcomeCode::PlannerFailed);
        assert!(outcome.trace.contains("syntax error"));
    }

    #[tokio::test]
    async fn test_response_not_saved_when_disabled() {
        let store = Arc::new(MemoryStore::default());
        let planner = Arc::new(StubPlanner::new(PlannerScript::Plan("p")));
        let agent = PlanningAgent::new(
            Arc::new(ScriptedModel::texts(&[FLAT_RESPONSE])),
            planner,
            store.clone(),
            config().with_save_response(false),
        );
        let paths = paths();
        let outcome = agent.run("t", &paths, &NoProgress).await;
        assert!(outcome.is_success());
        assert!(store.get(paths.response.as_ref().unwrap()).is_none());
    }
}

//! CLI entrypoint for nl2plan
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use nl2plan_application::{
    ArtifactPaths, BatchRunner, BatchTask, ConversationLogger, LanguageModel, NoConversationLogger,
    NoProgress, PipelineProgress, PlanningAgent,
};
use nl2plan_domain::config::validation::has_errors;
use nl2plan_domain::{ConfigIssueCode, Dialect};
use nl2plan_infrastructure::{
    CannedModel, CommandModel, CommandPlanner, ConfigLoader, FileConfig, FsArtifactStore,
    JsonlConversationLogger, ModelKind,
};
use nl2plan_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    info!("Starting nl2plan");

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        if let Some(path) = &cli.config
            && !path.exists()
        {
            bail!("Config file not found: {}", path.display());
        }
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Invalid configuration: {}", e))?
    };
    apply_overrides(&mut config, &cli);

    let template = config
        .extraction
        .load_template()
        .context("Failed to load the prompt template")?;
    let pipeline = config.to_pipeline_config(template);

    let mut issues = config.validate();
    issues.extend(
        pipeline
            .validate()
            .into_iter()
            .filter(|i| i.code == ConfigIssueCode::MissingPlaceholder),
    );
    if !issues.is_empty() {
        eprintln!("{}", ConsoleFormatter::format_issues(&issues));
    }
    if has_errors(&issues) {
        bail!("Configuration has errors; see above");
    }

    // === Dependency Injection ===
    let model = build_model(&config)?;
    let planner = Arc::new(
        CommandPlanner::new(&config.planner.command)
            .with_no_plan_markers(config.planner.no_plan_markers.clone())
            .with_timeout(config.planner.timeout_secs.map(Duration::from_secs)),
    );
    let store = Arc::new(FsArtifactStore::new());
    let conversation_logger: Arc<dyn ConversationLogger> = match &config.output.conversation_log {
        Some(path) => Arc::new(JsonlConversationLogger::open(path).with_context(|| {
            format!("Failed to open conversation log {}", path.display())
        })?),
        None => Arc::new(NoConversationLogger),
    };

    let dialect = pipeline.resolved_dialect();
    let agent = PlanningAgent::new(model, planner, store.clone(), pipeline)
        .with_conversation_logger(conversation_logger);

    let progress: Box<dyn PipelineProgress> = if cli.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };
    let output_root = config.output.directory.clone();

    // Batch mode
    if let Some(dir) = &cli.batch {
        let tasks = load_batch_tasks(dir)?;
        info!("Loaded {} task(s) from {}", tasks.len(), dir.display());

        let runner = BatchRunner::new(Arc::new(agent), store);
        let summary = runner.run(&tasks, &output_root, progress.as_ref()).await?;

        let output = match cli.output {
            OutputFormat::Text => ConsoleFormatter::format_summary(&summary),
            OutputFormat::Json => ConsoleFormatter::format_summary_json(&summary),
        };
        println!("{}", output);

        if summary.failed > 0 {
            drop(log_guard);
            std::process::exit(1);
        }
        return Ok(());
    }

    // Single task mode
    let description = match (&cli.task_file, &cli.task) {
        (Some(path), _) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read task file {}", path.display()))?,
        (None, Some(task)) => task.clone(),
        (None, None) => bail!(
            "A task description is required. Pass it as an argument, or use --task-file or --batch."
        ),
    };

    let paths = ArtifactPaths::in_dir(&output_root.join(&cli.name), &cli.name, dialect);
    let outcome = agent.run(&description, &paths, progress.as_ref()).await;

    let output = match cli.output {
        OutputFormat::Text => ConsoleFormatter::format_outcome(&outcome, &paths),
        OutputFormat::Json => ConsoleFormatter::format_outcome_json(&outcome, &paths),
    };
    println!("{}", output);

    if !outcome.is_success() {
        drop(log_guard);
        // -1 becomes 255
        std::process::exit(outcome.code.code().rem_euclid(256));
    }
    Ok(())
}

/// Console logging from the `-v` count, plus an optional log file.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow!("Log file path has no file name: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Command-line flags win over every configuration source.
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(out) = &cli.out {
        config.output.directory = out.clone();
    }
    if let Some(template) = &cli.template {
        config.extraction.template_file = Some(template.clone());
    }
    if cli.htn {
        config.pipeline.htn = true;
    }
    if let Some(dialect) = cli.dialect {
        config.pipeline.dialect = Some(Dialect::from(dialect).to_string().to_lowercase());
    }
    if let Some(name) = &cli.domain_name {
        config.pipeline.domain_name = name.clone();
    }
    if let Some(name) = &cli.problem_name {
        config.pipeline.problem_name = name.clone();
    }
    if let Some(max) = cli.max_retries {
        config.extraction.max_retries = max;
    }
    if let Some(delay) = cli.retry_delay_ms {
        config.extraction.retry_delay_ms = delay;
    }
    if let Some(command) = &cli.model_command {
        config.model.kind = ModelKind::Command.to_string();
        config.model.command = Some(command.clone());
    }
    if !cli.replay.is_empty() {
        config.model.kind = ModelKind::Canned.to_string();
        config.model.responses.clear();
        config.model.response_files = cli.replay.clone();
    }
    if let Some(planner) = &cli.planner {
        config.planner.command = planner.clone();
    }
    if let Some(path) = &cli.conversation_log {
        config.output.conversation_log = Some(path.clone());
    }
}

fn build_model(config: &FileConfig) -> Result<Arc<dyn LanguageModel>> {
    let timeout = config.model.timeout_secs.map(Duration::from_secs);
    let model: Arc<dyn LanguageModel> = match config.model.parse_kind().0 {
        ModelKind::Canned => {
            let mut responses = config.model.responses.clone();
            for path in &config.model.response_files {
                responses.push(std::fs::read_to_string(path).with_context(|| {
                    format!("Failed to read canned response {}", path.display())
                })?);
            }
            let mut model = CannedModel::new(responses);
            if let Some(name) = &config.model.name {
                model = model.with_name(name);
            }
            Arc::new(model)
        }
        ModelKind::Command => {
            let command = config
                .model
                .command
                .as_deref()
                .ok_or_else(|| anyhow!("model.command must be set when model.kind is 'command'"))?;
            let mut model = CommandModel::new(command).with_timeout(timeout);
            if let Some(name) = &config.model.name {
                model = model.with_name(name);
            }
            Arc::new(model)
        }
    };
    info!("Using language model '{}'", model.name());
    Ok(model)
}

/// Every regular, non-hidden file in `dir`, sorted by name.
fn load_batch_tasks(dir: &Path) -> Result<Vec<BatchTask>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read batch directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| !n.starts_with('.'))
        })
        .collect();
    files.sort();

    files
        .into_iter()
        .map(|path| {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| anyhow!("Task file name is not UTF-8: {}", path.display()))?
                .to_string();
            let description = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read task file {}", path.display()))?;
            Ok(BatchTask::new(name, description))
        })
        .collect()
}

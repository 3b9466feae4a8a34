//! CLI command definitions

use clap::{Parser, ValueEnum};
use nl2plan_domain::Dialect;
use std::path::PathBuf;

/// Output format for run and batch results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored human-readable report
    #[default]
    Text,
    /// JSON object on stdout
    Json,
}

/// Target planning language
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
    Pddl,
    Hddl,
    Hpdl,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Pddl => Dialect::Pddl,
            DialectArg::Hddl => Dialect::Hddl,
            DialectArg::Hpdl => Dialect::Hpdl,
        }
    }
}

/// CLI arguments for nl2plan
#[derive(Parser, Debug)]
#[command(name = "nl2plan")]
#[command(author, version, about = "Turn natural-language task descriptions into planning models and plans")]
#[command(long_about = r#"
nl2plan asks a language model to describe a planning task as structured
markdown, assembles a PDDL/HDDL/HPDL domain and problem from the answer,
and hands both to an external planner.

Each run goes through four phases:
1. Extract: query the model and parse the response (retried on malformed output)
2. Render:  write the domain and problem definitions
3. Save:    store the files (and the raw response)
4. Plan:    run the planner and store the plan

Configuration files are loaded from (in priority order):
1. NL2PLAN_* environment variables (NL2PLAN_PLANNER__COMMAND=...)
2. --config <path>     Explicit config file
3. ./nl2plan.toml      Project-level config
4. ~/.config/nl2plan/config.toml   Global config

Example:
  nl2plan --planner "ff -o {domain} -f {problem}" "Stack block a on block b"
  nl2plan -f tasks/t1.txt --name t1 --htn --dialect hpdl
  nl2plan --batch tasks/ --out results/
"#)]
pub struct Cli {
    /// Task description (ignored with --task-file or --batch)
    pub task: Option<String>,

    /// Read the task description from a file
    #[arg(short = 'f', long, value_name = "PATH", conflicts_with = "batch")]
    pub task_file: Option<PathBuf>,

    /// Run every file in a directory as one task (file stem = task name)
    #[arg(short, long, value_name = "DIR")]
    pub batch: Option<PathBuf>,

    /// Name of a single run; artifacts go to <out>/<name>/
    #[arg(short, long, default_value = "task")]
    pub name: String,

    /// Output directory for artifacts
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Prompt template file containing {task_desc}
    #[arg(short, long, value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// Extract hierarchical tasks and methods
    #[arg(long)]
    pub htn: bool,

    /// Target dialect (default: hddl with --htn, pddl otherwise)
    #[arg(short, long, value_enum)]
    pub dialect: Option<DialectArg>,

    /// Domain name written into the definitions
    #[arg(long, value_name = "NAME")]
    pub domain_name: Option<String>,

    /// Problem name written into the definitions
    #[arg(long, value_name = "NAME")]
    pub problem_name: Option<String>,

    /// Maximum extraction attempts
    #[arg(long, value_name = "N")]
    pub max_retries: Option<usize>,

    /// Pause between extraction attempts in milliseconds
    #[arg(long, value_name = "MS")]
    pub retry_delay_ms: Option<u64>,

    /// Command that reads a prompt on stdin and prints the model answer
    #[arg(long, value_name = "CMD", conflicts_with = "replay")]
    pub model_command: Option<String>,

    /// Replay saved model responses instead of querying a model
    #[arg(long, value_name = "PATH")]
    pub replay: Vec<PathBuf>,

    /// Planner command line with {domain} and {problem} placeholders
    #[arg(short, long, value_name = "CMD")]
    pub planner: Option<String>,

    /// Append a JSONL transcript of prompts and responses to this file
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,

    /// Write tracing output to this file as well
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_single_run_args() {
        let cli = Cli::try_parse_from([
            "nl2plan",
            "--htn",
            "-d",
            "hpdl",
            "--max-retries",
            "5",
            "-vv",
            "stack a on b",
        ])
        .unwrap();
        assert_eq!(cli.task.as_deref(), Some("stack a on b"));
        assert!(cli.htn);
        assert_eq!(cli.dialect.map(Dialect::from), Some(Dialect::Hpdl));
        assert_eq!(cli.max_retries, Some(5));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.name, "task");
        assert_eq!(cli.output, OutputFormat::Text);
    }

    #[test]
    fn test_batch_conflicts_with_task_file() {
        assert!(Cli::try_parse_from(["nl2plan", "--batch", "tasks", "-f", "t1.txt"]).is_err());
    }

    #[test]
    fn test_replay_collects_paths() {
        let cli = Cli::try_parse_from([
            "nl2plan",
            "--replay",
            "a.txt",
            "--replay",
            "b.txt",
            "-f",
            "t.txt",
        ])
        .unwrap();
        assert_eq!(cli.replay.len(), 2);
        assert!(cli.task.is_none());
    }
}

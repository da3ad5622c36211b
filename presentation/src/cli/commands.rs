//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for cycle results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Final answer with plan, scores and audit details
    Full,
    /// Only the final answer
    Answer,
    /// JSON response envelope
    Json,
}

/// CLI arguments for autologic
#[derive(Parser, Debug)]
#[command(name = "autologic")]
#[command(author, version, about = "Self-discovering reasoning over resilient LLM calls")]
#[command(long_about = r#"
autologic answers a task by composing a reasoning plan from a catalog of
strategies, executing it, and checking the result.

The cycle:
  ANALYZE -> SELECT -> ADAPT -> STRUCTURE -> VERIFY -> EXECUTE <-> CRITIQUE
  -> SYNTHESIZE -> AUDIT -> DONE

A rejected answer is retried with the critic's feedback, or the plan is
rebuilt when the critic blames the plan.

Configuration files are loaded from (in priority order):
1. AUTOLOGIC_* environment variables (e.g. AUTOLOGIC_LLM__ACTIVE_MODEL)
2. --config <path>     Explicit config file
3. ./autologic.toml    Project-level config
4. ~/.config/autologic/config.toml   Global config

Example:
  autologic "Plan a three-day trip to Kyoto on a 500 EUR budget"
  autologic -p ollama -m llama3.1 "Explain the CAP theorem in 5 bullet points"
  autologic --output json --trace run.jsonl "Compare B-trees and LSM-trees"
"#)]
pub struct Cli {
    /// The task to reason about
    pub task: Option<String>,

    /// Provider of the --model override; defaults to the configured one
    #[arg(short, long, value_name = "PROVIDER", requires = "model")]
    pub provider: Option<String>,

    /// Use this single model for root, worker and audit
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Maximum execute attempts, restructures included
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,

    /// Base wall-clock budget of the audit loop, in seconds (at most one day)
    #[arg(
        long,
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u64).range(1..=86_400)
    )]
    pub audit_timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "answer")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Record every progress event to a JSONL file
    #[arg(long, value_name = "PATH")]
    pub trace: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// List the loaded reasoning strategies and exit
    #[arg(long)]
    pub list_strategies: bool,

    /// List the models the root provider offers and exit
    #[arg(long)]
    pub list_models: bool,
}

impl Cli {
    /// Whether the invocation only prints information
    pub fn is_informational(&self) -> bool {
        self.show_config || self.list_strategies || self.list_models
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_task_and_overrides() {
        let cli = Cli::try_parse_from([
            "autologic",
            "-p",
            "ollama",
            "-m",
            "llama3.1",
            "--max-retries",
            "5",
            "--audit-timeout",
            "45",
            "-o",
            "json",
            "-vv",
            "Explain Raft",
        ])
        .unwrap();

        assert_eq!(cli.task.as_deref(), Some("Explain Raft"));
        assert_eq!(cli.provider.as_deref(), Some("ollama"));
        assert_eq!(cli.model.as_deref(), Some("llama3.1"));
        assert_eq!(cli.max_retries, Some(5));
        assert_eq!(cli.audit_timeout, Some(45));
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.is_informational());
    }

    #[test]
    fn test_audit_timeout_is_bounded() {
        assert!(Cli::try_parse_from(["autologic", "--audit-timeout", "0", "task"]).is_err());
        assert!(
            Cli::try_parse_from(["autologic", "--audit-timeout", "18446744073709551615", "task"])
                .is_err()
        );
        let cli = Cli::try_parse_from(["autologic", "--audit-timeout", "86400", "task"]).unwrap();
        assert_eq!(cli.audit_timeout, Some(86_400));
    }

    #[test]
    fn test_provider_requires_model() {
        assert!(Cli::try_parse_from(["autologic", "-p", "ollama", "task"]).is_err());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["autologic", "--list-strategies"]).unwrap();
        assert!(cli.task.is_none());
        assert_eq!(cli.output, OutputFormat::Answer);
        assert!(cli.is_informational());
    }
}

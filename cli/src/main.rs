//! CLI entrypoint for autologic
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use autologic_application::{
    CompositeProgressSink, CycleOptions, CycleResponse, ModelRoster, ProgressSink,
    ReasoningEngine, ResilienceRegistry,
};
use autologic_domain::{ModelRole, ModelSpec, ProviderKind, Task};
use autologic_infrastructure::{
    CatalogLoader, ConfigLoader, FileConfig, JsonlProgressLogger, ModelFactory,
};
use autologic_presentation::{
    Cli, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress,
};
use clap::Parser;
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting autologic");

    // === Configuration ===
    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{line}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&cli)?;

    if !config.output.color || cli.output == OutputFormat::Json {
        colored::control::set_override(false);
    }

    let catalog = CatalogLoader::load(config.catalog.path.as_deref());
    if cli.list_strategies {
        print!("{}", ConsoleFormatter::format_catalog(&catalog));
        return Ok(ExitCode::SUCCESS);
    }

    // === Dependency Injection ===
    let registry = Arc::new(ResilienceRegistry::new());
    let factory = ModelFactory::new(config.llm.clone(), registry);

    if cli.list_models {
        let client = factory.create(ModelRole::Root)?;
        let models = client
            .list_models()
            .await
            .with_context(|| format!("Failed to list models on {}", client.provider()))?;
        print!(
            "{}",
            ConsoleFormatter::format_models(client.provider().as_str(), &models)
        );
        return Ok(ExitCode::SUCCESS);
    }

    let Some(content) = cli.task.clone() else {
        bail!("A task is required. Run with --help for usage.");
    };
    let task = Task::try_new(content).ok_or_else(|| anyhow!("Task cannot be empty"))?;

    let roster = build_roster(&cli, &config, &factory)?;
    let engine = ReasoningEngine::new(roster, Arc::new(catalog), config.engine.to_params());

    // === Cycle ===
    let cancellation = CancellationToken::new();
    spawn_interrupt_handler(cancellation.clone());

    let mut options = CycleOptions::new().with_cancellation(cancellation);
    if let Some(max) = cli.max_retries {
        options = options.with_max_retries(max);
    }
    if let Some(seconds) = cli.audit_timeout {
        options = options.with_audit_timeout(Duration::from_secs(seconds));
    }

    let progress = build_progress(&cli, &config);
    let result = engine
        .run_cycle_with_progress(&task, &options, &progress)
        .await;

    // === Output ===
    let succeeded = result.is_ok();
    match (cli.output, result) {
        (OutputFormat::Json, result) => {
            println!("{}", ConsoleFormatter::format_json(&CycleResponse::from(result)));
        }
        (OutputFormat::Full, Ok(report)) => println!("{}", ConsoleFormatter::format(&report)),
        (OutputFormat::Answer, Ok(report)) => {
            print!("{}", ConsoleFormatter::format_answer_only(&report));
        }
        (_, Err(e)) => eprint!("{}", ConsoleFormatter::format_error(&e.to_string())),
    }

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Initialize logging based on verbosity level; `RUST_LOG` takes precedence
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("Invalid log file path: {}", path.display()))?;
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .init();

    Ok(Some(guard))
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {e}"))?
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// The configured roster, or one model for every role when `--model` is given
fn build_roster(cli: &Cli, config: &FileConfig, factory: &ModelFactory) -> Result<ModelRoster> {
    let Some(model) = &cli.model else {
        return Ok(factory.roster()?);
    };

    let provider: ProviderKind = cli
        .provider
        .as_deref()
        .unwrap_or(config.llm.active_provider.as_str())
        .parse()?;
    let spec = ModelSpec::new(provider, model.clone());
    info!("Using {} for every role", spec);
    Ok(factory.single_model_roster(&spec)?)
}

fn build_progress(cli: &Cli, config: &FileConfig) -> CompositeProgressSink {
    let mut progress = CompositeProgressSink::new();

    if !cli.quiet && config.output.show_progress {
        let console: Arc<dyn ProgressSink> = if std::io::stderr().is_terminal() {
            Arc::new(ProgressReporter::new())
        } else {
            Arc::new(SimpleProgress)
        };
        progress = progress.with(console);
    }

    if let Some(path) = &cli.trace {
        match JsonlProgressLogger::new(path) {
            Some(logger) => {
                let run_id = chrono::Utc::now().format("%Y%m%dT%H%M%S%3f").to_string();
                progress = progress.with(Arc::new(logger.with_run_id(run_id)));
            }
            None => warn!("Progress trace disabled: cannot write {}", path.display()),
        }
    }

    progress
}

/// Cancel the running cycle on Ctrl+C
fn spawn_interrupt_handler(cancellation: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; cancelling the cycle");
            cancellation.cancel();
        }
    });
}

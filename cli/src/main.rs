//! CLI entrypoint for Engine Council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use council_application::{
    ConsultOptions, DeliberateOptions, EngineQuery, EngineRegistry, NoProgress, Orchestrator,
    ProgressNotifier, SharedRegistry,
};
use council_infrastructure::{ConfigLoader, JsonlConsultationLogger, register_builtins};
use council_presentation::{
    Cli, Command, ConsoleFormatter, ConsultArgs, DeliberateArgs, EnginesArgs, EvaluateArgs,
    OutputFormat, OutputFormatter, ProgressReporter, SimpleProgress,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level; RUST_LOG wins when set
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Engine Council");

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        println!();
        println!("Effective configuration:");
        println!("{}", file_config.to_toml()?);
        return Ok(());
    }

    let orchestrator_config = file_config
        .to_orchestrator_config()
        .context("Invalid configuration")?;

    let format = OutputFormat::from(
        file_config
            .output
            .resolve_format(cli.output.map(Into::into)),
    );
    ConsoleFormatter::set_color(file_config.output.use_color(cli.no_color));

    // === Dependency Injection ===
    let mut registry = EngineRegistry::new();
    register_builtins(&mut registry).context("Failed to register built-in engines")?;
    let registry = registry.into_shared();

    let mut orchestrator =
        Orchestrator::new(Arc::clone(&registry)).with_config(orchestrator_config);
    if let Some(path) = cli
        .log_file
        .clone()
        .or_else(|| file_config.logging.consultation_log.clone())
    {
        match JsonlConsultationLogger::new(&path) {
            Some(logger) => orchestrator = orchestrator.with_logger(Arc::new(logger)),
            None => warn!("Consultation log disabled: cannot open {}", path.display()),
        }
    }

    let Some(command) = cli.command else {
        bail!("A command is required. Run `council --help` for usage.");
    };

    // Progress bars would interleave with JSON on a terminal
    let show_progress = !cli.quiet && format != OutputFormat::Json;
    // Plain lines when verbose, so log output and the bar do not fight over stderr
    let progress: Box<dyn ProgressNotifier> = match (show_progress, cli.verbose) {
        (false, _) => Box::new(NoProgress),
        (true, 0) => Box::new(ProgressReporter::new()),
        (true, _) => Box::new(SimpleProgress),
    };

    let output = match command {
        Command::Consult(args) => {
            consult(&orchestrator, args, progress.as_ref(), format).await
        }
        Command::Deliberate(args) => {
            deliberate(&orchestrator, args, progress.as_ref(), format).await
        }
        Command::Evaluate(args) => evaluate(&orchestrator, args, format).await?,
        Command::Engines(args) => engines(&registry, args, format)?,
    };

    println!("{}", output);

    Ok(())
}

async fn consult(
    orchestrator: &Orchestrator,
    args: ConsultArgs,
    progress: &dyn ProgressNotifier,
    format: OutputFormat,
) -> String {
    let mut options = ConsultOptions::new()
        .with_domains(args.domains)
        .with_capabilities(args.capabilities)
        .with_engines(args.engines);
    if let Some(strategy) = args.strategy {
        options = options.with_strategy(strategy);
    }
    if let Some(max) = args.max_engines {
        options = options.with_max_engines(max);
    }
    if let Some(ms) = args.timeout_ms {
        options = options.with_timeout(Duration::from_millis(ms));
    }

    let result = orchestrator
        .consult_with_progress(&args.question, options, progress)
        .await;
    ConsoleFormatter.render_consultation(&result, format)
}

async fn deliberate(
    orchestrator: &Orchestrator,
    args: DeliberateArgs,
    progress: &dyn ProgressNotifier,
    format: OutputFormat,
) -> String {
    let mut options = DeliberateOptions::new().with_traditions(args.traditions);
    if let Some(ms) = args.timeout_ms {
        options = options.with_timeout(Duration::from_millis(ms));
    }

    let result = orchestrator
        .deliberate_with_progress(&args.dilemma, options, progress)
        .await;
    ConsoleFormatter.render_deliberation(&result, format)
}

async fn evaluate(
    orchestrator: &Orchestrator,
    args: EvaluateArgs,
    format: OutputFormat,
) -> Result<String> {
    let insight = orchestrator
        .evaluate_with(&args.engine, &args.input)
        .await
        .with_context(|| format!("Engine '{}' did not produce an insight", args.engine))?;

    Ok(match format {
        OutputFormat::Json => ConsoleFormatter.format_json(&insight),
        OutputFormat::Full | OutputFormat::Synthesis => ConsoleFormatter::format_insight(&insight),
    })
}

fn engines(
    registry: &SharedRegistry,
    args: EnginesArgs,
    format: OutputFormat,
) -> Result<String> {
    let registry = registry
        .read()
        .map_err(|_| anyhow!("Engine registry lock poisoned"))?;

    let mut query = EngineQuery::new();
    if let Some(domain) = args.domain {
        query = query.domain(domain);
    }
    if let Some(tag) = args.capability {
        query = query.capability(tag);
    }
    let snapshots: Vec<_> = registry
        .query(&query)
        .iter()
        .map(|engine| engine.snapshot())
        .collect();
    let load_order = registry
        .resolve_load_order()
        .context("Engine dependencies cannot be resolved")?;

    Ok(match format {
        OutputFormat::Json => ConsoleFormatter::format_engines_json(&snapshots, &load_order),
        OutputFormat::Full | OutputFormat::Synthesis => {
            ConsoleFormatter::format_engines(&snapshots, &load_order)
        }
    })
}

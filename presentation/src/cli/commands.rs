//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use council_domain::SynthesisStrategy;
use std::path::PathBuf;

/// Output format for council results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every insight, failure and the synthesis
    Full,
    /// Only the synthesized answer
    Synthesis,
    /// JSON output
    Json,
}

impl From<council_domain::OutputFormat> for OutputFormat {
    fn from(format: council_domain::OutputFormat) -> Self {
        match format {
            council_domain::OutputFormat::Full => OutputFormat::Full,
            council_domain::OutputFormat::Synthesis => OutputFormat::Synthesis,
            council_domain::OutputFormat::Json => OutputFormat::Json,
        }
    }
}

impl From<OutputFormat> for council_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => council_domain::OutputFormat::Full,
            OutputFormat::Synthesis => council_domain::OutputFormat::Synthesis,
            OutputFormat::Json => council_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for engine-council
#[derive(Parser, Debug)]
#[command(name = "council")]
#[command(author, version, about = "Engine Council - Consult specialized engines and synthesize their insights")]
#[command(long_about = r#"
Engine Council sends a question to a set of specialized engines at once,
waits for every one of them (each within its own time budget) and combines
the surviving insights with a synthesis strategy.

Strategies:
  weighted-average     Mean confidence, every insight quoted (default)
  highest-confidence   The single most confident insight
  consensus            Boosted mean when engines agree, otherwise multi-perspective
  multi-perspective    All insights side by side, unresolved confidence
  dialectic            Strongest thesis against its best antithesis

Configuration files are loaded from (in priority order):
1. COUNCIL_* environment variables (e.g. COUNCIL_ORCHESTRATOR__TIMEOUT_MS)
2. --config <path>     Explicit config file
3. ./council.toml      Project-level config
4. ~/.config/engine-council/config.toml   Global config

Example:
  council consult "Should we migrate the database on Friday?"
  council consult -d risk -d logic -s consensus "Delete the production logs"
  council deliberate -t deontology -t care "Is it right to lie to protect a friend?"
  council engines
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (defaults to the config file value, then synthesis)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Append consultation events as JSONL to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Consult engines on a question and synthesize their insights
    Consult(ConsultArgs),

    /// Deliberate a dilemma across competing traditions
    Deliberate(DeliberateArgs),

    /// Invoke a single engine directly
    Evaluate(EvaluateArgs),

    /// List registered engines
    Engines(EnginesArgs),
}

#[derive(Args, Debug)]
pub struct ConsultArgs {
    /// The question to put to the engines
    pub question: String,

    /// Consult engines in this domain (repeatable; union across domains)
    #[arg(short, long = "domain", value_name = "DOMAIN")]
    pub domains: Vec<String>,

    /// Require this capability (repeatable)
    #[arg(short, long = "capability", value_name = "TAG")]
    pub capabilities: Vec<String>,

    /// Consult exactly these engines (repeatable; overrides domain selection)
    #[arg(short, long = "engine", value_name = "ID")]
    pub engines: Vec<String>,

    /// Synthesis strategy
    #[arg(short, long, value_name = "STRATEGY")]
    pub strategy: Option<SynthesisStrategy>,

    /// Maximum number of engines to consult
    #[arg(long, value_name = "N")]
    pub max_engines: Option<usize>,

    /// Per-engine timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

#[derive(Args, Debug)]
pub struct DeliberateArgs {
    /// The dilemma to deliberate
    pub dilemma: String,

    /// Only hear engines of this tradition (repeatable)
    #[arg(short, long = "tradition", value_name = "TRADITION")]
    pub traditions: Vec<String>,

    /// Per-engine timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Engine id
    pub engine: String,

    /// Input passed to the engine
    pub input: String,
}

#[derive(Args, Debug)]
pub struct EnginesArgs {
    /// Only list engines in this domain
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Only list engines with this capability
    #[arg(short, long)]
    pub capability: Option<String>,
}

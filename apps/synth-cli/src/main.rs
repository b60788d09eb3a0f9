//! Compliance document synthesis CLI
//!
//! Runs the synthesis engine over an answer file and writes the generated
//! document fields and remediation actions as JSON, or injects one generated
//! document into a template.
//!
//! ## Usage
//!
//! ```text
//! synth-cli generate --answers answers.json [--registry bindings.json]
//!     [--config engine.toml] [--now 2024-07-01T00:00:00Z] [--output out.json]
//! synth-cli generate --answers answers.json --template policy.txt
//!     --document MASTER_SECURITY_POLICY
//! synth-cli registry [--registry bindings.json]
//! ```

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

/// Command-line arguments for synth-cli
#[derive(Parser, Debug)]
#[command(name = "synth-cli")]
#[command(about = "Generate compliance document text and remediation plans from assessment answers")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate document fields and remediation actions
    Generate(GenerateArgs),
    /// Show the questions and documents a registry defines
    Registry {
        /// Registry JSON file (defaults to the built-in rule set)
        #[arg(long)]
        registry: Option<PathBuf>,
    },
}

/// Shape of the records in the answers file
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Records already carrying compliance_status and risk_level
    Answers,
    /// Raw submissions with selected_option and score, classified on load
    Submissions,
}

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// JSON array of answer records
    #[arg(long)]
    answers: PathBuf,

    #[arg(long, value_enum, default_value = "answers")]
    input_format: InputFormat,

    /// Registry JSON file (defaults to the built-in rule set)
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Engine configuration TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Generation time (RFC 3339); defaults to now
    #[arg(long)]
    now: Option<DateTime<Utc>>,

    /// Template to inject a generated document into
    #[arg(long, requires = "document")]
    template: Option<PathBuf>,

    /// Document whose fields fill the template
    #[arg(long, requires = "template")]
    document: Option<String>,

    /// Write output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays clean for generated output
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match args.command {
        Command::Generate(generate) => commands::generate(&generate),
        Command::Registry { registry } => commands::describe_registry(registry.as_deref()),
    }
}

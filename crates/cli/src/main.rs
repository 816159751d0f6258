//! GA4 Audit CLI - run the audit engine over exported report tables.
//!
//! # Usage
//!
//! ```bash
//! # Print the four report queries an external fetcher should run
//! ga4-audit queries
//!
//! # Audit four decoded report tables and print a text report
//! ga4-audit run \
//!     --sessions sessions.json \
//!     --channels channels.json \
//!     --transactions transactions.json \
//!     --funnel funnel.json
//!
//! # Same, with thresholds from a file and JSON output
//! ga4-audit run ... --thresholds thresholds.yaml --format json
//! ```
//!
//! # Commands
//!
//! - `run` - Audit four report tables
//! - `queries` - Print the report query catalog
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Log filter (default: `ga4_audit_cli=info`)
//! - `GA4_AUDIT_LOG_FORMAT` - Set to `json` for structured logs
//! - `GA4_AUDIT_LOW_ENGAGEMENT_THRESHOLD` - Sessions per user threshold
//! - `GA4_AUDIT_HIGH_UNASSIGNED_PERCENT` - Unassigned traffic threshold

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod render;

use commands::run::{OutputFormat, RunArgs};
use error::CliError;

#[derive(Parser)]
#[command(name = "ga4-audit")]
#[command(author, version, about = "GA4 property audit over exported report tables")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit four report tables and print the result
    Run {
        /// Sessions and users table (JSON)
        #[arg(long)]
        sessions: PathBuf,

        /// Channel group and medium table (JSON)
        #[arg(long)]
        channels: PathBuf,

        /// Transactions table (JSON)
        #[arg(long)]
        transactions: PathBuf,

        /// Funnel events table (JSON)
        #[arg(long)]
        funnel: PathBuf,

        /// Threshold overrides (YAML); falls back to the environment
        #[arg(long)]
        thresholds: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the report queries for the 90-day window as JSON
    Queries,
}

fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Run {
            sessions,
            channels,
            transactions,
            funnel,
            thresholds,
            format,
        } => commands::run::execute(&RunArgs {
            sessions,
            channels,
            transactions,
            funnel,
            thresholds,
            format,
        }),
        Commands::Queries => commands::queries::execute(),
    }
}

/// Log to stderr so report output on stdout stays clean.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ga4_audit_cli=info".into());

    let use_json = std::env::var("GA4_AUDIT_LOG_FORMAT").is_ok_and(|v| v == "json");
    let json_layer = use_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!use_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

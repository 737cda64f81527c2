//! Docent - document Q&A agent.
//!
//! Main entry point for the Docent CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{ask, chat};
use config::DocentConfig;

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Docent - answers questions over a document corpus
#[derive(Parser)]
#[command(name = "docent")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a config file (default: <config dir>/docent/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Model identifier override
    #[arg(long, global = true, env = "DOCENT_MODEL")]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a one-shot question
    Ask(ask::AskArgs),

    /// Enter interactive chat mode (REPL)
    Chat(chat::ChatArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Entry Point
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = DocentConfig::load(cli.config.as_deref())?;
    if let Some(model) = cli.model {
        config.model = model;
    }

    match cli.command {
        Commands::Ask(args) => ask::run(args, &config).await,
        Commands::Chat(args) => chat::run(args, &config).await,
    }
}

/// Initialize tracing to stderr, honoring `RUST_LOG` when set.
fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "docent=debug,docent_agent=debug,docent_llm=debug,docent_corpus=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

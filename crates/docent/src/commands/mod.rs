//! CLI commands.

pub mod ask;
pub mod chat;

use std::sync::Arc;

use anyhow::{Context, Result};
use console::Style;
use tokio::task::JoinHandle;

use docent_agent::{Orchestrator, OrchestratorConfig, SnapshotReceiver, Turn};
use docent_corpus::{CorpusConfig, HttpDocumentStore};
use docent_llm::GeminiBackend;

use crate::config::DocentConfig;

/// Build an orchestrator from the resolved configuration.
pub fn build_orchestrator(config: &DocentConfig) -> Result<Orchestrator> {
    let backend = GeminiBackend::from_env()
        .context("backend setup failed; is GEMINI_API_KEY set?")?;
    let store = HttpDocumentStore::new(CorpusConfig::new(&config.corpus_base_url))
        .context("corpus client setup failed")?;

    let mut orchestrator_config = OrchestratorConfig::new(&config.model)
        .with_max_iterations(config.max_iterations);
    if let Some(temperature) = config.temperature {
        orchestrator_config = orchestrator_config.with_temperature(temperature);
    }

    Ok(Orchestrator::new(
        Arc::new(backend),
        Arc::new(store),
        orchestrator_config,
    ))
}

/// Drain turn snapshots, printing each newly completed tool invocation.
///
/// Runs until the sender side is dropped at the end of the turn.
pub fn spawn_progress_printer(mut rx: SnapshotReceiver) -> JoinHandle<()> {
    tokio::spawn(async move {
        let dim = Style::new().dim();
        let mut seen = 0usize;

        while let Some(snapshot) = rx.recv().await {
            for invocation in snapshot.tool_invocations.iter().skip(seen) {
                let status = if invocation.is_success() { "ok" } else { "failed" };
                println!(
                    "{}",
                    dim.apply_to(format!(
                        "[{} {} … {} ({}ms)]",
                        invocation.tool_name, invocation.arguments, status, invocation.duration_ms
                    ))
                );
            }
            seen = snapshot.tool_invocations.len();
        }
    })
}

/// Print the outcome of a completed turn.
pub fn print_turn(turn: &Turn) {
    match &turn.model_response {
        Some(response) if turn.is_failed() => {
            let red = Style::new().red();
            eprintln!("{} {}", red.apply_to("✗"), response.content);
        }
        Some(response) => {
            println!("{}", response.content);
        }
        None => {
            let dim = Style::new().dim();
            println!(
                "{}",
                dim.apply_to("[the agent stopped without producing an answer]")
            );
        }
    }
}

//! Ask command - one-shot question to the agent.

use anyhow::Result;
use clap::Args;

use docent_agent::snapshot_channel;

use super::{build_orchestrator, print_turn, spawn_progress_printer};
use crate::config::DocentConfig;

/// Arguments for the ask command.
#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to send
    #[arg(required = true)]
    pub prompt: String,
}

/// Run the ask command.
pub async fn run(args: AskArgs, config: &DocentConfig) -> Result<()> {
    if args.prompt.trim().is_empty() {
        anyhow::bail!("the question must not be empty");
    }

    let mut orchestrator = build_orchestrator(config)?;

    let (tx, rx) = snapshot_channel();
    let printer = spawn_progress_printer(rx);

    let turn = orchestrator.process_query(&args.prompt, &tx).await;
    drop(tx);
    let _ = printer.await;

    print_turn(&turn);

    if turn.is_failed() {
        anyhow::bail!("turn failed");
    }
    Ok(())
}

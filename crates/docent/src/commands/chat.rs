//! Chat command - interactive REPL mode.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use console::Style;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use uuid::Uuid;

use docent_agent::{ConversationExport, Turn, snapshot_channel};

use super::{build_orchestrator, print_turn, spawn_progress_printer};
use crate::config::DocentConfig;

/// Arguments for the chat command.
#[derive(Args, Debug)]
pub struct ChatArgs {}

/// Run the chat command (REPL).
pub async fn run(_args: ChatArgs, config: &DocentConfig) -> Result<()> {
    let mut orchestrator = build_orchestrator(config)?;
    let mut editor = DefaultEditor::new()?;

    let conversation_id = format!("conv-{}", Uuid::new_v4().simple());
    let created_at = Utc::now();
    let mut turns: Vec<Turn> = Vec::new();

    let dim = Style::new().dim();
    println!(
        "{}",
        dim.apply_to(format!(
            "docent {} · {} · :export <path> to save, :quit to leave",
            docent_agent::AGENT_VERSION,
            config.model
        ))
    );

    loop {
        match editor.readline("docent> ") {
            Ok(line) => {
                let input = line.trim();
                // Empty queries never reach the orchestrator.
                if input.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(input);

                if input == ":quit" || input == ":exit" {
                    break;
                }
                if let Some(path) = input.strip_prefix(":export") {
                    let path = path.trim();
                    if path.is_empty() {
                        eprintln!("usage: :export <path>");
                        continue;
                    }
                    match write_export(path.as_ref(), &conversation_id, created_at, config, &turns)
                    {
                        Ok(()) => println!("{}", dim.apply_to(format!("exported to {}", path))),
                        Err(e) => eprintln!("export failed: {:#}", e),
                    }
                    continue;
                }

                let (tx, rx) = snapshot_channel();
                let printer = spawn_progress_printer(rx);

                let turn = orchestrator.process_query(input, &tx).await;
                drop(tx);
                let _ = printer.await;

                print_turn(&turn);
                turns.push(turn);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

/// Serialize the conversation export to a pretty JSON file.
fn write_export(
    path: &Path,
    conversation_id: &str,
    created_at: chrono::DateTime<Utc>,
    config: &DocentConfig,
    turns: &[Turn],
) -> Result<()> {
    let export = ConversationExport::build(
        conversation_id,
        created_at,
        Utc::now(),
        &config.model,
        turns,
    );
    let json = serde_json::to_string_pretty(&export).context("failed to serialize export")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write export to {}", path.display()))?;
    Ok(())
}

//! Subcommand: `voxflow run` -- stdin stands in for the speech recognizer.
//!
//! Each line is a final transcript. While an action is waiting for
//! confirmation the next line answers it instead (`y`/`yes` approves,
//! anything else rejects).

use std::io::{self, BufRead};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::info;
use voxflow_actions::PendingConfirmations;
use voxflow_llm::config::env_non_empty;
use voxflow_voice::{ListenOutcome, Transcript, listen};

use crate::app::{Ports, build_app, llm_planner};
use crate::config::VoxflowConfig;
use crate::console::{ConsoleSpeech, ConsoleUi};

const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Run the interactive loop.
pub async fn cmd_run(config: VoxflowConfig, no_llm: bool) -> Result<()> {
    let planner = if no_llm {
        None
    } else {
        llm_planner(&config.llm, env_non_empty)?
    };
    let llm_status = if planner.is_some() { "enabled" } else { "disabled" };

    let (notify_tx, mut notify_rx) = mpsc::unbounded_channel();
    let confirmations =
        Arc::new(PendingConfirmations::new(CONFIRMATION_TIMEOUT).with_notifier(notify_tx));

    let app = build_app(
        &config,
        Ports {
            gate: confirmations.clone(),
            ui: Arc::new(ConsoleUi),
            sink: Arc::new(ConsoleSpeech),
            planner,
        },
    )?;
    info!(llm = llm_status, "starting voxflow");

    println!();
    println!("  voxflow v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "  {} components, {} workflows, LLM planner {llm_status}.",
        app.registry.len(),
        app.voice.workflows().len()
    );
    println!("  Say something (type a command), 'help' for commands, 'stop' to exit.");
    println!();

    tokio::spawn(async move {
        while let Some(request) = notify_rx.recv().await {
            println!("  Confirm \"{}\"? [y/N]", request.label);
        }
    });

    // A plain thread: a blocking stdin read would otherwise hold up runtime
    // shutdown.
    let (line_tx, line_rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    let (transcript_tx, transcript_rx) = mpsc::channel(16);
    let router = tokio::spawn(route_lines(line_rx, transcript_tx, confirmations));

    let report = listen(transcript_rx, &app.voice, config.recognition.clone()).await;
    router.abort();

    let reason = match report.outcome {
        ListenOutcome::Stopped => "stopped",
        ListenOutcome::Ended => "recognition ended",
        ListenOutcome::Failed => "recognition failed",
        ListenOutcome::Closed => "input closed",
    };
    info!(handled = report.handled, reason, "shutting down");
    println!("  Goodbye ({} commands handled).", report.handled);
    Ok(())
}

/// Forward input lines as transcripts, diverting answers to pending
/// confirmations.
async fn route_lines(
    mut lines: mpsc::Receiver<String>,
    transcripts: mpsc::Sender<Transcript>,
    confirmations: Arc<PendingConfirmations>,
) {
    while let Some(line) = lines.recv().await {
        if let Some(request) = confirmations.pending().into_iter().next() {
            if is_affirmative(&line) {
                confirmations.approve(request.id);
            } else {
                confirmations.reject(request.id);
            }
            continue;
        }
        if transcripts.send(Transcript::final_text(line)).await.is_err() {
            break;
        }
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes" | "ok" | "confirm"
    )
}

//! Terminal stand-ins for the UI and speech ports.

use async_trait::async_trait;
use voxflow_actions::ExecutionResult;
use voxflow_speech::{SpeechOptions, SpeechSink};
use voxflow_voice::{UiBridge, UiCommand};

/// Prints UI commands instead of driving a real interface.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleUi;

#[async_trait]
impl UiBridge for ConsoleUi {
    async fn perform(&self, command: &UiCommand) -> ExecutionResult {
        println!("  [ui] {command}");
        ExecutionResult::ok(format!("Sent to UI: {command}"))
    }
}

/// Prints spoken feedback.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSpeech;

#[async_trait]
impl SpeechSink for ConsoleSpeech {
    async fn speak(&self, text: &str, options: &SpeechOptions) -> voxflow_speech::Result<()> {
        tracing::debug!(lang = %options.lang, rate = options.rate, "speaking");
        println!("  voxflow> {text}");
        Ok(())
    }
}

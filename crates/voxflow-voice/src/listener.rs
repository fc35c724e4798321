//! Recognition event loop.
//!
//! Results, engine ends and engine errors arrive on one channel and are run
//! through a [`RecognitionSession`], which decides whether listening
//! continues.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use voxflow_speech::{
    Directive, RecognitionConfig, RecognitionErrorKind, RecognitionSession, SessionState,
};

use crate::dispatcher::{VoiceCommandExecutor, is_stop};

/// One recognition result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub is_final: bool,
}

impl Transcript {
    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }

    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }
}

/// Something the recognition engine reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RecognitionEvent {
    Result(Transcript),
    /// The engine ended on its own (end of utterance, silence timeout).
    End,
    /// The engine failed with an error code such as `"no-speech"`.
    Error { code: String },
}

impl RecognitionEvent {
    pub fn error(code: impl Into<String>) -> Self {
        Self::Error { code: code.into() }
    }
}

impl From<Transcript> for RecognitionEvent {
    fn from(transcript: Transcript) -> Self {
        Self::Result(transcript)
    }
}

/// Why [`listen`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenOutcome {
    /// A command asked to stop listening.
    Stopped,
    /// The engine ended and the session is not continuous.
    Ended,
    /// The engine reported an error restarting cannot fix.
    Failed,
    /// The event stream closed.
    Closed,
}

/// Summary of a listening session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenReport {
    pub outcome: ListenOutcome,
    /// Final transcripts handed to the executor.
    pub handled: usize,
    /// Engine restarts requested after an end or a recoverable error.
    pub restarts: usize,
}

/// Feed recognition events from `rx` into `executor` until a command asks to
/// stop, the session halts, or the sender side is dropped. Interim and blank
/// transcripts are skipped.
pub async fn listen<E>(
    mut rx: mpsc::Receiver<E>,
    executor: &VoiceCommandExecutor,
    config: RecognitionConfig,
) -> ListenReport
where
    E: Into<RecognitionEvent>,
{
    let mut session = RecognitionSession::new(config);
    session.start();
    let mut handled = 0;
    let mut restarts = 0;

    while let Some(event) = rx.recv().await {
        let event: RecognitionEvent = event.into();
        let directive = match event {
            RecognitionEvent::Result(transcript) => {
                let Some(command) = session.on_result(&transcript.text, transcript.is_final)
                else {
                    tracing::trace!(text = %transcript.text, "interim transcript skipped");
                    continue;
                };

                handled += 1;
                let result = executor.handle_command(&command).await;
                if !is_stop(&result) {
                    continue;
                }
                session.stop();
                tracing::info!(handled, "listener stopped by command");
                return ListenReport {
                    outcome: ListenOutcome::Stopped,
                    handled,
                    restarts,
                };
            }
            RecognitionEvent::End => session.on_end(),
            RecognitionEvent::Error { code } => {
                session.on_error(&RecognitionErrorKind::from_code(&code))
            }
        };

        match directive {
            Directive::Restart(delay) => {
                restarts += 1;
                tracing::debug!(delay_ms = delay.as_millis() as u64, "recognition restart");
            }
            Directive::Halt => {
                let outcome = if session.state() == SessionState::Stopped {
                    ListenOutcome::Failed
                } else {
                    ListenOutcome::Ended
                };
                tracing::info!(handled, outcome = ?outcome, "recognition halted");
                return ListenReport {
                    outcome,
                    handled,
                    restarts,
                };
            }
            Directive::Start | Directive::Ignore => {}
        }
    }

    tracing::info!(handled, "recognition event stream closed");
    ListenReport {
        outcome: ListenOutcome::Closed,
        handled,
        restarts,
    }
}

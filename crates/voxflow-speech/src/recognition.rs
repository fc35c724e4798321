//! Restart policy for a continuous speech recognizer.
//!
//! [`RecognitionSession`] does not touch audio. It consumes the events a
//! recognition engine reports and answers with a [`Directive`] telling the
//! engine driver what to do next.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Recognizer tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    pub lang: String,
    /// Keep listening across utterances.
    pub continuous: bool,
    pub interim_results: bool,
    /// Delay before restarting after a natural end or a recoverable error.
    #[serde(with = "millis")]
    pub restart_delay: Duration,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            lang: "en-US".into(),
            continuous: true,
            interim_results: false,
            restart_delay: Duration::from_millis(300),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

/// Error codes a recognition engine can report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    NoSpeech,
    NotAllowed,
    AudioCapture,
    Aborted,
    Network,
    Other(String),
}

impl RecognitionErrorKind {
    /// Map an engine error code (`"no-speech"`, `"not-allowed"`, ...).
    pub fn from_code(code: &str) -> Self {
        match code {
            "no-speech" => Self::NoSpeech,
            "not-allowed" | "service-not-allowed" => Self::NotAllowed,
            "audio-capture" => Self::AudioCapture,
            "aborted" => Self::Aborted,
            "network" => Self::Network,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Errors after which restarting cannot help.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::NotAllowed | Self::AudioCapture)
    }
}

/// What the engine driver should do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Start the engine now.
    Start,
    /// Start the engine again after the given delay.
    Restart(Duration),
    /// Stop the engine; do not restart.
    Halt,
    /// Nothing to do.
    Ignore,
}

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Listening,
    /// Stopped by the user or by a fatal error. Terminal until `start`.
    Stopped,
}

/// Continuous-listening policy state machine.
#[derive(Debug, Clone)]
pub struct RecognitionSession {
    config: RecognitionConfig,
    state: SessionState,
}

impl RecognitionSession {
    pub fn new(config: RecognitionConfig) -> Self {
        Self {
            config,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &RecognitionConfig {
        &self.config
    }

    pub fn is_listening(&self) -> bool {
        self.state == SessionState::Listening
    }

    /// Request listening. A start while already listening is ignored.
    pub fn start(&mut self) -> Directive {
        if self.is_listening() {
            tracing::debug!("recognition already running, start ignored");
            return Directive::Ignore;
        }
        self.state = SessionState::Listening;
        tracing::info!(lang = %self.config.lang, "recognition started");
        Directive::Start
    }

    /// User-requested stop.
    pub fn stop(&mut self) -> Directive {
        self.state = SessionState::Stopped;
        tracing::info!("recognition stopped");
        Directive::Halt
    }

    /// A recognition result arrived. Returns the trimmed transcript when it
    /// is final and non-empty.
    pub fn on_result(&self, transcript: &str, is_final: bool) -> Option<String> {
        if !is_final || !self.is_listening() {
            return None;
        }
        let text = transcript.trim();
        (!text.is_empty()).then(|| text.to_owned())
    }

    /// The engine ended on its own (end of utterance, silence timeout).
    pub fn on_end(&mut self) -> Directive {
        if !self.is_listening() {
            return Directive::Ignore;
        }
        if self.config.continuous {
            Directive::Restart(self.config.restart_delay)
        } else {
            self.state = SessionState::Idle;
            Directive::Halt
        }
    }

    /// The engine reported an error.
    pub fn on_error(&mut self, kind: &RecognitionErrorKind) -> Directive {
        if !self.is_listening() {
            return Directive::Ignore;
        }
        if kind.is_fatal() {
            tracing::warn!(error = ?kind, "recognition cannot continue");
            self.state = SessionState::Stopped;
            return Directive::Halt;
        }
        match kind {
            RecognitionErrorKind::NoSpeech => {
                tracing::debug!("no speech detected, restarting");
                Directive::Restart(Duration::ZERO)
            }
            other => {
                tracing::warn!(error = ?other, "recognition error, restarting");
                Directive::Restart(self.config.restart_delay)
            }
        }
    }
}

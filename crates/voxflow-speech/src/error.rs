//! Speech error types.

/// Unified error type for speech sinks.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    /// No speech engine is available on this host.
    #[error("speech output unavailable: {reason}")]
    Unavailable { reason: String },

    /// The engine accepted the utterance but failed to speak it.
    #[error("speech synthesis failed: {reason}")]
    SynthesisFailed { reason: String },
}

/// Convenience alias used throughout the speech crate.
pub type Result<T> = std::result::Result<T, SpeechError>;

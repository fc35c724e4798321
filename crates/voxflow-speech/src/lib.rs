//! Speech input and output for voxflow.
//!
//! - **[`sink`]** -- the [`SpeechSink`] text-to-speech port with a silent and
//!   a tracing implementation.
//! - **[`announcer`]** -- [`Announcer`], preference-gated spoken feedback.
//! - **[`recognition`]** -- [`RecognitionSession`], the restart policy for a
//!   continuous recognizer.

pub mod announcer;
pub mod error;
pub mod recognition;
pub mod sink;

pub use announcer::{Announcer, SpeechPreferences};
pub use error::{Result, SpeechError};
pub use recognition::{
    Directive, RecognitionConfig, RecognitionErrorKind, RecognitionSession, SessionState,
};
pub use sink::{SilentSpeech, SpeechOptions, SpeechSink, TracingSpeech};

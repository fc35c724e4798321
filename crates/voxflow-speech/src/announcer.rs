//! Preference-gated speech output.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::sink::{SpeechOptions, SpeechSink};

/// User preferences for spoken feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechPreferences {
    pub enabled: bool,
    #[serde(flatten)]
    pub options: SpeechOptions,
}

impl Default for SpeechPreferences {
    fn default() -> Self {
        Self {
            enabled: true,
            options: SpeechOptions::default(),
        }
    }
}

/// Speaks feedback through a sink when the user has speech enabled.
///
/// Never fails: sink errors are logged and dropped.
#[derive(Clone)]
pub struct Announcer {
    sink: Arc<dyn SpeechSink>,
    preferences: SpeechPreferences,
}

impl Announcer {
    pub fn new(sink: Arc<dyn SpeechSink>, preferences: SpeechPreferences) -> Self {
        Self { sink, preferences }
    }

    pub fn preferences(&self) -> &SpeechPreferences {
        &self.preferences
    }

    /// Speak `text`. Returns whether it was handed to the sink successfully.
    pub async fn announce(&self, text: &str) -> bool {
        if !self.preferences.enabled || text.trim().is_empty() {
            return false;
        }
        match self.sink.speak(text, &self.preferences.options).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "speech output failed");
                false
            }
        }
    }
}

impl std::fmt::Debug for Announcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Announcer")
            .field("preferences", &self.preferences)
            .finish_non_exhaustive()
    }
}

//! Text-to-speech sink port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpeechError};

/// Voice parameters for a single utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechOptions {
    /// BCP-47 language tag.
    pub lang: String,
    pub pitch: f32,
    pub rate: f32,
    /// `0.0..=1.0`.
    pub volume: f32,
    pub voice_name: Option<String>,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            lang: "en-US".into(),
            pitch: 1.0,
            rate: 1.0,
            volume: 1.0,
            voice_name: None,
        }
    }
}

/// Something that can speak text aloud.
#[async_trait]
pub trait SpeechSink: Send + Sync {
    async fn speak(&self, text: &str, options: &SpeechOptions) -> Result<()>;
}

/// A sink for hosts with no speech engine. Every call fails as unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSpeech;

#[async_trait]
impl SpeechSink for SilentSpeech {
    async fn speak(&self, _text: &str, _options: &SpeechOptions) -> Result<()> {
        Err(SpeechError::Unavailable {
            reason: "no speech engine attached".into(),
        })
    }
}

/// Emits every utterance as a tracing event instead of audio.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSpeech;

#[async_trait]
impl SpeechSink for TracingSpeech {
    async fn speak(&self, text: &str, options: &SpeechOptions) -> Result<()> {
        tracing::info!(
            lang = %options.lang,
            voice = options.voice_name.as_deref().unwrap_or("default"),
            "speak: {text}"
        );
        Ok(())
    }
}

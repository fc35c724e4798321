//! `voxflow.toml` configuration.
//!
//! Every section is optional. A missing file yields the defaults; a file that
//! exists but does not parse is an error.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use voxflow_actions::MatcherConfig;
use voxflow_intent::CustomIntent;
use voxflow_llm::LlmConfig;
use voxflow_llm::config::{BASE_URL_VAR, MODEL_VAR};
use voxflow_speech::{RecognitionConfig, SpeechPreferences};
use voxflow_workflow::WorkflowDefinition;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VoxflowConfig {
    pub general: GeneralConfig,
    pub llm: LlmSection,
    pub matcher: MatcherConfig,
    pub speech: SpeechPreferences,
    pub recognition: RecognitionConfig,
    /// Extra intent patterns, tried after the built-in table.
    pub intents: Vec<CustomIntent>,
    /// Components mounted into the action catalog at startup.
    pub components: Vec<ComponentSpec>,
    /// Static workflows, selected by trigger phrase.
    pub workflows: Vec<WorkflowDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

/// `[llm]`: overrides for the planner's model settings. The API key only
/// ever comes from the environment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub enabled: bool,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            enabled: true,
            model: None,
            base_url: None,
            temperature: None,
            max_tokens: None,
            timeout_secs: None,
        }
    }
}

impl LlmSection {
    /// Resolve the LLM settings through `lookup`.
    ///
    /// Returns `None` when disabled or when no API key is set. Model and base
    /// URL environment variables take precedence over the file.
    pub fn resolve<F>(&self, lookup: F) -> Option<LlmConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        if !self.enabled {
            return None;
        }
        let mut config = LlmConfig::from_lookup(&lookup)?;

        if lookup(MODEL_VAR).is_none()
            && let Some(model) = &self.model
        {
            config = config.with_model(model.clone());
        }
        if lookup(BASE_URL_VAR).is_none()
            && let Some(base_url) = &self.base_url
        {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(temperature) = self.temperature {
            config.temperature = temperature;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = max_tokens;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        Some(config)
    }
}

/// A `[[components]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub voice_interactable: Option<bool>,
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

/// A `[[components.actions]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionSpec {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub i18n_key: Option<String>,
    #[serde(default)]
    pub voice_commands: Vec<String>,
    #[serde(default)]
    pub confirmation_required: bool,
}

impl VoxflowConfig {
    /// Load from `path`, or defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

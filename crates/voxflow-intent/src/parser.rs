//! Intent parser: turns a raw utterance into a structured [`Intent`].
//!
//! Patterns are evaluated in registration order and the **first** match
//! wins. Built-ins come first; custom intents are appended behind them unless
//! registered with [`IntentParser::register_custom_first`].

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IntentError, Result};
use crate::patterns::{IntentPattern, SlotMap, builtin_patterns};
use crate::types::{Intent, IntentType};

// ---------------------------------------------------------------------------
// Custom intents
// ---------------------------------------------------------------------------

/// A dynamically registered intent.
///
/// Capture group 1 becomes `target` and group 2 becomes `value`; named
/// groups are copied into `parameters`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomIntent {
    pub name: String,
    pub pattern: String,
    #[serde(default = "default_custom_confidence")]
    pub confidence: f64,
}

fn default_custom_confidence() -> f64 {
    crate::patterns::BUILTIN_CONFIDENCE
}

impl CustomIntent {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            confidence: default_custom_confidence(),
        }
    }

    fn compile(&self) -> Result<IntentPattern> {
        if self.name.trim().is_empty() {
            return Err(IntentError::EmptyName);
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(IntentError::InvalidConfidence {
                name: self.name.clone(),
                confidence: self.confidence,
            });
        }
        let regex = Regex::new(&self.pattern).map_err(|e| IntentError::InvalidPattern {
            name: self.name.clone(),
            pattern: self.pattern.clone(),
            reason: e.to_string(),
        })?;
        Ok(IntentPattern {
            intent_type: self.name.parse().unwrap_or(IntentType::Unknown),
            regex,
            slots: SlotMap {
                target: Some(1),
                value: Some(2),
            },
            confidence: self.confidence,
        })
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Ordered, first-match-wins intent parser.
///
/// Holds no state between calls: parsing the same text twice yields equal
/// intents.
#[derive(Debug, Clone)]
pub struct IntentParser {
    patterns: Vec<IntentPattern>,
}

impl Default for IntentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentParser {
    /// Create a parser loaded with the built-in pattern table.
    pub fn new() -> Self {
        Self {
            patterns: builtin_patterns(),
        }
    }

    /// Append a custom intent behind every existing pattern.
    pub fn register_custom(&mut self, custom: CustomIntent) -> Result<()> {
        let pattern = custom.compile()?;
        debug!(name = %custom.name, pattern = %custom.pattern, "custom intent appended");
        self.patterns.push(pattern);
        Ok(())
    }

    /// Insert a custom intent ahead of every existing pattern.
    pub fn register_custom_first(&mut self, custom: CustomIntent) -> Result<()> {
        let pattern = custom.compile()?;
        debug!(name = %custom.name, pattern = %custom.pattern, "custom intent prepended");
        self.patterns.insert(0, pattern);
        Ok(())
    }

    /// Intent names in evaluation order.
    pub fn intent_names(&self) -> Vec<&str> {
        self.patterns.iter().map(|p| p.intent_type.as_str()).collect()
    }

    /// Parse an utterance. Never fails; unmatched text yields
    /// [`Intent::unknown`].
    pub fn parse(&self, command: &str) -> Intent {
        let text = command.trim();

        for pattern in &self.patterns {
            let Some(caps) = pattern.regex.captures(text) else {
                continue;
            };

            let (target, value) = pattern.slots.extract(&caps);
            let parameters: HashMap<String, String> = pattern
                .regex
                .capture_names()
                .flatten()
                .filter_map(|name| {
                    caps.name(name)
                        .map(|m| (name.to_owned(), m.as_str().trim().to_owned()))
                })
                .collect();

            let intent = Intent {
                intent_type: pattern.intent_type.clone(),
                action: pattern.intent_type.as_str().to_owned(),
                target,
                value,
                parameters,
                confidence: pattern.confidence,
                raw_text: text.to_owned(),
            };

            debug!(
                intent = %intent.intent_type,
                target = ?intent.target,
                value = ?intent.value,
                "intent matched"
            );
            return intent;
        }

        debug!(text = %text, "no intent pattern matched");
        Intent::unknown(text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

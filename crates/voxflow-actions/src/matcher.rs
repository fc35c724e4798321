//! Command-to-action matching.
//!
//! A linear scan over every action of a voice-interactable component scores the normalized command
//! against each voice command phrase and then the label, keeping the single
//! best candidate. Ties keep the first candidate found, so the result depends
//! only on catalog order.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::registry::ActionCatalog;
use crate::types::{ActionMatch, ActionMetadata, ComponentConfig};

/// Confidence for an exact voice command match.
pub const EXACT_COMMAND: f64 = 1.0;
/// Confidence for an exact label match.
pub const EXACT_LABEL: f64 = 0.9;
/// Confidence when one of command / voice command contains the other.
pub const SUBSTRING_COMMAND: f64 = 0.8;
/// Confidence when one of command / label contains the other.
pub const SUBSTRING_LABEL: f64 = 0.7;
/// Confidence when any word of the command occurs in the candidate.
pub const TOKEN_OVERLAP: f64 = 0.6;

/// Matcher tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Matches scoring below this are discarded.
    pub min_confidence: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_confidence: TOKEN_OVERLAP,
        }
    }
}

/// Which field of an action a phrase came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CandidateKind {
    VoiceCommand,
    Label,
}

/// Score `command` (already normalized) against one candidate phrase.
fn score(command: &str, candidate: &str, kind: CandidateKind) -> f64 {
    let candidate = normalize(candidate);
    if command.is_empty() || candidate.is_empty() {
        return 0.0;
    }

    let (exact, substring) = match kind {
        CandidateKind::VoiceCommand => (EXACT_COMMAND, SUBSTRING_COMMAND),
        CandidateKind::Label => (EXACT_LABEL, SUBSTRING_LABEL),
    };

    if command == candidate {
        exact
    } else if command.contains(&candidate) || candidate.contains(command) {
        substring
    } else if command
        .split_whitespace()
        .any(|token| candidate.contains(token))
    {
        TOKEN_OVERLAP
    } else {
        0.0
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Finds the registered action best matching a spoken command.
#[derive(Clone)]
pub struct ActionMatcher {
    catalog: Arc<dyn ActionCatalog>,
    config: MatcherConfig,
}

impl ActionMatcher {
    pub fn new(catalog: Arc<dyn ActionCatalog>) -> Self {
        Self::with_config(catalog, MatcherConfig::default())
    }

    pub fn with_config(catalog: Arc<dyn ActionCatalog>, config: MatcherConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> MatcherConfig {
        self.config
    }

    /// Return the best-scoring action for `command`, or `None` when nothing
    /// reaches [`MatcherConfig::min_confidence`].
    pub fn find_action_by_command(&self, command: &str) -> Option<ActionMatch> {
        let normalized = normalize(command);
        if normalized.is_empty() {
            return None;
        }

        let mut best: Option<(ActionMetadata, String, f64)> = None;
        let mut consider = |meta: &ActionMetadata, phrase: &str, kind: CandidateKind| {
            let confidence = score(&normalized, phrase, kind);
            if best.as_ref().is_none_or(|(_, _, top)| confidence > *top) {
                best = Some((meta.clone(), phrase.to_owned(), confidence));
            }
        };

        for component in self.catalog.voice_interactable_components() {
            for action in component.actions.iter().flatten() {
                let meta = ActionMetadata::from_parts(&component, action);
                for phrase in &meta.voice_commands {
                    consider(&meta, phrase, CandidateKind::VoiceCommand);
                }
                consider(&meta, &meta.label, CandidateKind::Label);
            }
        }

        let (meta, matched_command, confidence) = best?;
        if confidence < self.config.min_confidence || confidence <= 0.0 {
            tracing::debug!(command = %command, best = confidence, "no action matched");
            return None;
        }

        // Resolve the live handler; the component may have been unmounted
        // between the snapshot and now.
        let component = self
            .catalog
            .component_config(&meta.component_id)
            .filter(ComponentConfig::is_voice_interactable)?;
        let action = component.action(&meta.action_id)?.clone();

        tracing::debug!(
            command = %command,
            action_id = %meta.action_id,
            component_id = %meta.component_id,
            confidence,
            "action matched"
        );

        Some(ActionMatch {
            action,
            component_id: meta.component_id,
            component,
            confidence,
            matched_command,
        })
    }
}

impl std::fmt::Debug for ActionMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionMatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::handler_fn;
    use crate::registry::ActionRegistry;
    use crate::types::ActionItem;

    fn item(id: &str, label: &str, commands: &[&str]) -> ActionItem {
        ActionItem::new(id, label, handler_fn(|_| async { Ok(None) }))
            .with_voice_commands(commands.iter().copied())
    }

    fn matcher_with(components: Vec<ComponentConfig>) -> ActionMatcher {
        let registry = ActionRegistry::new();
        for c in components {
            registry.register_component(c);
        }
        ActionMatcher::new(Arc::new(registry))
    }

    fn save_form() -> ActionMatcher {
        matcher_with(vec![
            ComponentConfig::new("form1", "Form").with_action(item("save", "Save", &["save record"])),
        ])
    }

    #[test]
    fn score_tiers() {
        use CandidateKind::*;
        assert_eq!(score("save record", "Save Record", VoiceCommand), 1.0);
        assert_eq!(score("save", "save", Label), 0.9);
        assert_eq!(score("please save record now", "save record", VoiceCommand), 0.8);
        assert_eq!(score("save", "save record", VoiceCommand), 0.8);
        assert_eq!(score("please save", "Save it", Label), 0.6);
        assert_eq!(score("delete", "save", VoiceCommand), 0.0);
        assert_eq!(score("save", "   ", VoiceCommand), 0.0);
    }

    #[test]
    fn exact_command_match() {
        let m = save_form().find_action_by_command("Save Record").unwrap();
        assert_eq!(m.confidence, 1.0);
        assert_eq!(m.action.id, "save");
        assert_eq!(m.component_id, "form1");
        assert_eq!(m.matched_command, "save record");
    }

    #[test]
    fn substring_match() {
        let m = save_form()
            .find_action_by_command("please save record now")
            .unwrap();
        assert_eq!(m.confidence, 0.8);
    }

    #[test]
    fn token_overlap_match() {
        let m = save_form().find_action_by_command("record please").unwrap();
        assert_eq!(m.confidence, 0.6);
    }

    #[test]
    fn below_threshold_is_none() {
        assert!(save_form().find_action_by_command("discharge").is_none());
        assert!(save_form().find_action_by_command("   ").is_none());
    }

    #[test]
    fn custom_threshold() {
        let registry = ActionRegistry::new();
        registry.register_component(
            ComponentConfig::new("form1", "Form").with_action(item("save", "Save", &["save record"])),
        );
        let strict = ActionMatcher::with_config(
            Arc::new(registry),
            MatcherConfig {
                min_confidence: 0.9,
            },
        );
        assert!(strict.find_action_by_command("record please").is_none());
        assert!(strict.find_action_by_command("save record").is_some());
    }

    #[test]
    fn ties_keep_first_registered() {
        let matcher = matcher_with(vec![
            ComponentConfig::new("a", "A").with_action(item("first", "First", &["print"])),
            ComponentConfig::new("b", "B").with_action(item("second", "Second", &["print"])),
        ]);
        let m = matcher.find_action_by_command("print").unwrap();
        assert_eq!(m.action.id, "first");
    }

    #[test]
    fn higher_score_beats_earlier_candidate() {
        let matcher = matcher_with(vec![
            ComponentConfig::new("a", "A").with_action(item("partial", "Partial", &["export data"])),
            ComponentConfig::new("b", "B").with_action(item("exact", "Exact", &["export"])),
        ]);
        let m = matcher.find_action_by_command("export").unwrap();
        assert_eq!(m.action.id, "exact");
        assert_eq!(m.confidence, 1.0);
    }

    #[test]
    fn label_used_when_no_voice_commands() {
        let matcher = matcher_with(vec![
            ComponentConfig::new("grid", "Grid").with_action(item("refresh", "Refresh", &[])),
        ]);
        let m = matcher.find_action_by_command("refresh").unwrap();
        assert_eq!(m.confidence, 0.9);
        assert_eq!(m.matched_command, "Refresh");
    }

    #[test]
    fn non_interactable_components_never_match() {
        let matcher = matcher_with(vec![
            ComponentConfig::new("form1", "Form")
                .with_voice_interactable(false)
                .with_action(item("save", "Save", &["save record"])),
            ComponentConfig::new("grid", "Grid").with_action(item("refresh", "Refresh", &[])),
        ]);
        assert!(matcher.find_action_by_command("please save record now").is_none());
        assert!(matcher.find_action_by_command("save record").is_none());
        assert_eq!(
            matcher.find_action_by_command("refresh").unwrap().component_id,
            "grid"
        );
    }

    #[test]
    fn muting_a_component_after_registration_stops_matching() {
        let registry = Arc::new(ActionRegistry::new());
        registry.register_component(
            ComponentConfig::new("form1", "Form").with_action(item("save", "Save", &["save record"])),
        );
        let matcher = ActionMatcher::new(registry.clone());
        assert!(matcher.find_action_by_command("save record").is_some());

        registry.set_voice_interactable("form1", false).unwrap();
        assert!(matcher.find_action_by_command("save record").is_none());
    }
}

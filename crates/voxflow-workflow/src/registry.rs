//! Static named workflows, looked up by trigger phrase.
//!
//! Trigger phrases are compiled into a single case-insensitive Aho-Corasick
//! automaton. Every occurrence is considered, overlapping ones included; a
//! command selects the workflow whose phrase occurs leftmost (longest on ties,
//! then first registered) on word boundaries.

use std::cmp::Reverse;
use std::path::Path;

use aho_corasick::{AhoCorasick, MatchKind};
use serde::Deserialize;

use crate::error::{Result, WorkflowError};
use crate::types::WorkflowDefinition;

#[derive(Deserialize)]
struct WorkflowFile {
    #[serde(default)]
    workflows: Vec<WorkflowDefinition>,
}

/// Registry of static workflows in registration order.
#[derive(Default)]
pub struct WorkflowRegistry {
    workflows: Vec<WorkflowDefinition>,
    /// Per automaton pattern: index into `workflows`.
    phrase_owner: Vec<usize>,
    automaton: Option<AhoCorasick>,
}

impl WorkflowRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `[[workflows]]` tables from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: WorkflowFile = toml::from_str(text)?;
        let mut registry = Self::new();
        for workflow in file.workflows {
            registry.register(workflow)?;
        }
        Ok(registry)
    }

    /// Load `[[workflows]]` tables from a TOML file.
    pub fn load_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| WorkflowError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), count = registry.len(), "workflows loaded");
        Ok(registry)
    }

    /// Add a workflow. Ids must be unique.
    pub fn register(&mut self, workflow: WorkflowDefinition) -> Result<()> {
        if self.get(&workflow.id).is_some() {
            return Err(WorkflowError::DuplicateWorkflow {
                workflow_id: workflow.id,
            });
        }
        tracing::debug!(
            workflow_id = %workflow.id,
            triggers = workflow.trigger_phrases.len(),
            "static workflow registered"
        );
        self.workflows.push(workflow);
        self.rebuild();
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&WorkflowDefinition> {
        self.workflows.iter().find(|w| w.id == id)
    }

    pub fn list(&self) -> &[WorkflowDefinition] {
        &self.workflows
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }

    /// The workflow triggered by `command`, if any.
    pub fn find_by_trigger(&self, command: &str) -> Option<&WorkflowDefinition> {
        let ac = self.automaton.as_ref()?;
        let command = command.trim();

        // "print" must still match "print allergies" when "print all" is
        // also registered.
        ac.find_overlapping_iter(command)
            .filter(|m| on_word_boundary(command, m.start(), m.end()))
            .min_by_key(|m| (m.start(), Reverse(m.end()), m.pattern()))
            .map(|m| &self.workflows[self.phrase_owner[m.pattern().as_usize()]])
    }

    fn rebuild(&mut self) {
        let mut phrases = Vec::new();
        self.phrase_owner.clear();
        for (index, workflow) in self.workflows.iter().enumerate() {
            for phrase in &workflow.trigger_phrases {
                let phrase = phrase.trim();
                if !phrase.is_empty() {
                    phrases.push(phrase.to_owned());
                    self.phrase_owner.push(index);
                }
            }
        }

        if phrases.is_empty() {
            self.automaton = None;
            return;
        }

        match AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(&phrases)
        {
            Ok(ac) => {
                self.automaton = Some(ac);
                tracing::trace!(count = phrases.len(), "trigger automaton rebuilt");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to build trigger automaton");
                self.automaton = None;
            }
        }
    }
}

fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

impl std::fmt::Debug for WorkflowRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowRegistry")
            .field("workflows", &self.workflows.len())
            .field("phrases", &self.phrase_owner.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WorkflowStep;

    fn wf(id: &str, triggers: &[&str]) -> WorkflowDefinition {
        WorkflowDefinition {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            trigger_phrases: triggers.iter().map(|s| (*s).to_owned()).collect(),
            steps: vec![WorkflowStep::speak("s1", id)],
        }
    }

    #[test]
    fn trigger_match_is_case_insensitive() {
        let mut reg = WorkflowRegistry::new();
        reg.register(wf("rounds", &["start rounds"])).unwrap();
        assert_eq!(reg.find_by_trigger("Please START ROUNDS now").unwrap().id, "rounds");
        assert!(reg.find_by_trigger("stop").is_none());
    }

    #[test]
    fn leftmost_then_longest_wins() {
        let mut reg = WorkflowRegistry::new();
        reg.register(wf("discharge", &["discharge"])).unwrap();
        reg.register(wf("discharge-summary", &["discharge summary"])).unwrap();
        reg.register(wf("print", &["print"])).unwrap();

        assert_eq!(
            reg.find_by_trigger("discharge summary then print").unwrap().id,
            "discharge-summary"
        );
        assert_eq!(reg.find_by_trigger("print the discharge").unwrap().id, "print");
    }

    #[test]
    fn shorter_trigger_wins_when_longer_one_ends_mid_word() {
        let mut reg = WorkflowRegistry::new();
        reg.register(wf("print", &["print"])).unwrap();
        reg.register(wf("print-all", &["print all"])).unwrap();

        assert_eq!(reg.find_by_trigger("print allergies").unwrap().id, "print");
        assert_eq!(reg.find_by_trigger("print all charts").unwrap().id, "print-all");
        assert_eq!(reg.find_by_trigger("PRINT ALL").unwrap().id, "print-all");
    }

    #[test]
    fn same_phrase_goes_to_first_registered() {
        let mut reg = WorkflowRegistry::new();
        reg.register(wf("first", &["save"])).unwrap();
        reg.register(wf("second", &["save"])).unwrap();
        assert_eq!(reg.find_by_trigger("save").unwrap().id, "first");
    }

    #[test]
    fn partial_words_do_not_trigger() {
        let mut reg = WorkflowRegistry::new();
        reg.register(wf("print", &["print"])).unwrap();
        assert!(reg.find_by_trigger("blueprint review").is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut reg = WorkflowRegistry::new();
        reg.register(wf("a", &["x"])).unwrap();
        assert!(matches!(
            reg.register(wf("a", &["y"])),
            Err(WorkflowError::DuplicateWorkflow { .. })
        ));
    }

    #[test]
    fn loads_from_toml() {
        let text = r#"
            [[workflows]]
            id = "morning-rounds"
            name = "Morning rounds"
            trigger_phrases = ["start rounds", "morning rounds"]

            [[workflows.steps]]
            id = "s1"
            type = "speak"
            message = "Starting rounds"

            [[workflows.steps]]
            id = "s2"
            type = "wait"
            params = { duration = 10 }
        "#;
        let reg = WorkflowRegistry::from_toml_str(text).unwrap();
        assert_eq!(reg.len(), 1);
        let w = reg.find_by_trigger("morning rounds").unwrap();
        assert_eq!(w.steps.len(), 2);
        assert_eq!(w.steps[1].params.as_ref().unwrap()["duration"], 10);
    }

    #[test]
    fn empty_registry_matches_nothing() {
        assert!(WorkflowRegistry::new().find_by_trigger("anything").is_none());
    }
}

//! Workflow data model.
//!
//! Field names follow the camelCase JSON shape requested from the LLM; the
//! snake_case spellings are accepted too so TOML workflow files read
//! naturally.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use voxflow_actions::ActionMetadata;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// The kind of a workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    /// Run a registered action.
    Action,
    /// Declared branch point. Executes as a no-op.
    Condition,
    /// Declared loop. Executes as a no-op.
    Loop,
    /// Pause for `params.duration` milliseconds.
    Wait,
    /// Speak `message` through the announcer.
    Speak,
}

/// A single workflow step.
///
/// `next_step_id` and `on_error_step_id` are carried for callers that inspect
/// the graph; execution always visits steps in array order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type")]
    pub step_type: StepType,

    #[serde(default, alias = "action_id", skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,

    #[serde(default, alias = "component_id", skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, alias = "next_step_id", skip_serializing_if = "Option::is_none")]
    pub next_step_id: Option<String>,

    #[serde(default, alias = "on_error_step_id", skip_serializing_if = "Option::is_none")]
    pub on_error_step_id: Option<String>,
}

impl WorkflowStep {
    fn bare(id: impl Into<String>, step_type: StepType) -> Self {
        Self {
            id: id.into(),
            step_type,
            action_id: None,
            component_id: None,
            params: None,
            condition: None,
            message: None,
            next_step_id: None,
            on_error_step_id: None,
        }
    }

    /// An `action` step bound to `action_id` on `component_id`.
    pub fn action(
        id: impl Into<String>,
        action_id: impl Into<String>,
        component_id: impl Into<String>,
    ) -> Self {
        Self {
            action_id: Some(action_id.into()),
            component_id: Some(component_id.into()),
            ..Self::bare(id, StepType::Action)
        }
    }

    /// A `speak` step.
    pub fn speak(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::bare(id, StepType::Speak)
        }
    }

    /// A `wait` step pausing for `duration_ms`.
    pub fn wait(id: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            params: Some(serde_json::json!({ "duration": duration_ms })),
            ..Self::bare(id, StepType::Wait)
        }
    }

    /// A `condition` step. Never branches.
    pub fn condition(id: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            condition: Some(condition.into()),
            ..Self::bare(id, StepType::Condition)
        }
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// A named, ordered list of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "trigger_phrases")]
    pub trigger_phrases: Vec<String>,
    pub steps: Vec<WorkflowStep>,
}

/// Where a workflow's steps came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanSource {
    /// Planned by the LLM.
    Llm,
    /// Produced by the deterministic fallback planner.
    Fallback,
    /// A registered static workflow.
    Static,
}

// ---------------------------------------------------------------------------
// Planner input
// ---------------------------------------------------------------------------

/// Compact description of a voice-interactable component for planning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub action_ids: Vec<String>,
}

impl From<&voxflow_actions::ComponentConfig> for ComponentSummary {
    fn from(c: &voxflow_actions::ComponentConfig) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            description: c.description.clone(),
            action_ids: c.actions.iter().flatten().map(|a| a.id.clone()).collect(),
        }
    }
}

/// Everything a planner needs to turn a command into steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub user_command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub available_actions: Vec<ActionMetadata>,
    pub components: Vec<ComponentSummary>,
}

/// Outcome of [`crate::validate_workflow`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_deserializes_llm_shape() {
        let json = r#"{
            "id": "s1",
            "type": "action",
            "actionId": "save",
            "componentId": "form1",
            "params": {"force": true},
            "nextStepId": "s2"
        }"#;
        let step: WorkflowStep = serde_json::from_str(json).unwrap();
        assert_eq!(step.step_type, StepType::Action);
        assert_eq!(step.action_id.as_deref(), Some("save"));
        assert_eq!(step.next_step_id.as_deref(), Some("s2"));
    }

    #[test]
    fn step_accepts_snake_case_and_missing_id() {
        let json = r#"{"type":"action","action_id":"save","component_id":"form1"}"#;
        let step: WorkflowStep = serde_json::from_str(json).unwrap();
        assert!(step.id.is_empty());
        assert_eq!(step.component_id.as_deref(), Some("form1"));
    }

    #[test]
    fn step_serializes_type_tag() {
        let json = serde_json::to_value(WorkflowStep::speak("s1", "hello")).unwrap();
        assert_eq!(json["type"], "speak");
        assert_eq!(json["message"], "hello");
        assert!(json.get("actionId").is_none());
    }

    #[test]
    fn unknown_step_type_is_rejected() {
        let json = r#"{"id":"s1","type":"teleport"}"#;
        assert!(serde_json::from_str::<WorkflowStep>(json).is_err());
    }

    #[test]
    fn wait_builder_sets_duration() {
        let step = WorkflowStep::wait("w", 50);
        assert_eq!(step.params.unwrap()["duration"], 50);
    }
}

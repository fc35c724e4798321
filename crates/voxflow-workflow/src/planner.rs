//! Step planners: turn a spoken command into workflow steps.
//!
//! [`LlmStepPlanner`] asks a chat model for a `{"steps": [...]}` object.
//! [`FallbackPlanner`] is deterministic: one `action` step when the command
//! matches a registered action, otherwise one `speak` step echoing the
//! command back.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use voxflow_actions::ActionMatcher;
use voxflow_llm::config::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use voxflow_llm::{ChatRequest, LlmBackend, Message, strip_code_fences};

use crate::error::{Result, WorkflowError};
use crate::types::{PlanRequest, WorkflowStep};

/// Produces steps for a plan request.
#[async_trait]
pub trait StepPlanner: Send + Sync {
    async fn plan(&self, request: &PlanRequest) -> Result<Vec<WorkflowStep>>;
}

// ---------------------------------------------------------------------------
// Deterministic fallback
// ---------------------------------------------------------------------------

/// Deterministic single-step plan for `request.user_command`.
pub fn create_workflow_steps_fallback(
    request: &PlanRequest,
    matcher: &ActionMatcher,
) -> Vec<WorkflowStep> {
    let command = request.user_command.trim();
    match matcher.find_action_by_command(command) {
        Some(hit) => {
            tracing::debug!(
                command = %command,
                action_id = %hit.action.id,
                confidence = hit.confidence,
                "fallback planned action step"
            );
            vec![WorkflowStep::action("step-1", hit.action.id, hit.component_id)]
        }
        None => {
            tracing::debug!(command = %command, "fallback planned speak step");
            vec![WorkflowStep::speak(
                "step-1",
                format!("I heard \"{command}\", but I don't know how to do that yet."),
            )]
        }
    }
}

/// [`StepPlanner`] wrapper around [`create_workflow_steps_fallback`].
#[derive(Debug, Clone)]
pub struct FallbackPlanner {
    matcher: ActionMatcher,
}

impl FallbackPlanner {
    pub fn new(matcher: ActionMatcher) -> Self {
        Self { matcher }
    }
}

#[async_trait]
impl StepPlanner for FallbackPlanner {
    async fn plan(&self, request: &PlanRequest) -> Result<Vec<WorkflowStep>> {
        Ok(create_workflow_steps_fallback(request, &self.matcher))
    }
}

// ---------------------------------------------------------------------------
// LLM planner
// ---------------------------------------------------------------------------

const PLANNER_SYSTEM_PROMPT: &str = r#"You turn voice commands for a clinical web application into UI workflows.

Respond with a single JSON object and nothing else:
{"steps": [ { "id": "step-1", "type": "action", "actionId": "...", "componentId": "...", "params": {} } ]}

Step types:
- "action": run one of the available actions. actionId and componentId are required and must come from the list provided.
- "speak": say "message" to the user.
- "wait": pause for params.duration milliseconds.
- "condition" and "loop" are accepted but have no effect.

Use the fewest steps that accomplish the command. Steps run in order. If no available action fits, return a single speak step explaining that."#;

#[derive(Deserialize)]
struct StepsEnvelope {
    steps: Vec<WorkflowStep>,
}

/// Plans steps with a chat model.
#[derive(Clone)]
pub struct LlmStepPlanner {
    backend: Arc<dyn LlmBackend>,
    temperature: f32,
    max_tokens: u32,
}

impl LlmStepPlanner {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self {
            backend,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Build the chat request for `request`.
    pub fn build_request(&self, request: &PlanRequest) -> Result<ChatRequest> {
        let actions = serde_json::to_string_pretty(&request.available_actions)?;
        let components = serde_json::to_string_pretty(&request.components)?;

        let mut prompt = format!("Command: {}\n", request.user_command.trim());
        if let Some(context) = request.context.as_deref().filter(|c| !c.trim().is_empty()) {
            prompt.push_str(&format!("Context: {context}\n"));
        }
        prompt.push_str(&format!(
            "\nAvailable actions:\n{actions}\n\nComponents:\n{components}\n"
        ));

        Ok(ChatRequest::new(vec![
            Message::system(PLANNER_SYSTEM_PROMPT),
            Message::user(prompt),
        ])
        .with_temperature(self.temperature)
        .with_max_tokens(self.max_tokens))
    }
}

/// Parse a model reply into steps.
///
/// Accepts `{"steps": [...]}` or a bare array, optionally fenced.
pub fn parse_planner_reply(reply: &str) -> Result<Vec<WorkflowStep>> {
    let cleaned = strip_code_fences(reply);
    if let Ok(envelope) = serde_json::from_str::<StepsEnvelope>(cleaned) {
        return Ok(envelope.steps);
    }
    serde_json::from_str::<Vec<WorkflowStep>>(cleaned).map_err(|e| WorkflowError::PlanningFailed {
        reason: format!("failed to parse planner reply as steps: {e}"),
    })
}

#[async_trait]
impl StepPlanner for LlmStepPlanner {
    async fn plan(&self, request: &PlanRequest) -> Result<Vec<WorkflowStep>> {
        let chat = self.build_request(request)?;
        let reply = self.backend.complete(&chat).await?;
        let steps = parse_planner_reply(&reply)?;
        tracing::info!(
            command = %request.user_command,
            steps = steps.len(),
            "workflow planned via LLM"
        );
        Ok(steps)
    }
}

impl std::fmt::Debug for LlmStepPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmStepPlanner")
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

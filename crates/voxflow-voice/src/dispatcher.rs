//! Utterance dispatch.
//!
//! [`VoiceCommandExecutor::handle_command`] is the top of the voice pipeline:
//! static workflow triggers first, then the parsed intent decides between the
//! action catalog, the UI bridge and the workflow builder. Every outcome is a
//! spoken [`ExecutionResult`]; nothing escapes as an error.

use std::sync::Arc;

use serde_json::json;
use voxflow_actions::{ActionMatcher, ExecutionResult};
use voxflow_intent::{Intent, IntentParser, IntentType};
use voxflow_speech::Announcer;
use voxflow_workflow::{WorkflowBuilder, WorkflowRegistry};

use crate::ui::{UiBridge, UiCommand, UnattachedUi};

/// Dispatches spoken commands.
#[derive(Clone)]
pub struct VoiceCommandExecutor {
    parser: Arc<IntentParser>,
    matcher: ActionMatcher,
    builder: WorkflowBuilder,
    workflows: Arc<WorkflowRegistry>,
    ui: Arc<dyn UiBridge>,
    announcer: Option<Announcer>,
}

impl VoiceCommandExecutor {
    /// Executor with no static workflows, no UI and no speech output.
    pub fn new(parser: IntentParser, matcher: ActionMatcher, builder: WorkflowBuilder) -> Self {
        Self {
            parser: Arc::new(parser),
            matcher,
            builder,
            workflows: Arc::new(WorkflowRegistry::new()),
            ui: Arc::new(UnattachedUi),
            announcer: None,
        }
    }

    pub fn with_workflows(mut self, workflows: Arc<WorkflowRegistry>) -> Self {
        self.workflows = workflows;
        self
    }

    pub fn with_ui(mut self, ui: Arc<dyn UiBridge>) -> Self {
        self.ui = ui;
        self
    }

    pub fn with_announcer(mut self, announcer: Announcer) -> Self {
        self.announcer = Some(announcer);
        self
    }

    pub fn parser(&self) -> &IntentParser {
        &self.parser
    }

    pub fn workflows(&self) -> &WorkflowRegistry {
        &self.workflows
    }

    /// Handle one utterance and announce the outcome.
    pub async fn handle_command(&self, utterance: &str) -> ExecutionResult {
        let result = self.dispatch(utterance.trim()).await;

        if result.success {
            tracing::info!(command = %utterance.trim(), message = result.summary(), "voice command handled");
        } else {
            tracing::warn!(command = %utterance.trim(), error = result.summary(), "voice command failed");
        }

        if let Some(announcer) = &self.announcer {
            announcer.announce(result.summary()).await;
        }
        result
    }

    async fn dispatch(&self, command: &str) -> ExecutionResult {
        if command.is_empty() {
            return ExecutionResult::failure("empty command");
        }

        if let Some(workflow) = self.workflows.find_by_trigger(command) {
            tracing::debug!(command, workflow_id = %workflow.id, "static workflow triggered");
            return self.builder.executor().execute(workflow, None).await;
        }

        let intent = self.parser.parse(command);
        tracing::debug!(
            command,
            intent = %intent.intent_type,
            confidence = intent.confidence,
            "intent parsed"
        );

        match &intent.intent_type {
            IntentType::Help => self.help(),
            IntentType::Stop => ExecutionResult::ok("Stopped listening").with_data(json!({ "stop": true })),
            t if t.is_click() => match self.run_matched_action(command).await {
                Some(result) => result,
                None => self.forward_to_ui(&intent).await,
            },
            IntentType::Unknown | IntentType::Custom(_) => match self.run_matched_action(command).await {
                Some(result) => result,
                None => self.build_and_run(command).await,
            },
            _ => self.forward_to_ui(&intent).await,
        }
    }

    /// Execute the catalog action the command names, if one matches.
    async fn run_matched_action(&self, command: &str) -> Option<ExecutionResult> {
        let hit = self.matcher.find_action_by_command(command)?;
        let actions = self.builder.executor().actions();
        if !actions.validate_action(&hit.action.id, &hit.component_id) {
            tracing::debug!(
                command,
                action_id = %hit.action.id,
                component_id = %hit.component_id,
                "matched action is not voice-addressable"
            );
            return None;
        }
        tracing::debug!(
            command,
            action_id = %hit.action.id,
            component_id = %hit.component_id,
            confidence = hit.confidence,
            "command matched action"
        );
        Some(
            actions
                .execute_action(&hit.action.id, &hit.component_id, None)
                .await,
        )
    }

    async fn forward_to_ui(&self, intent: &Intent) -> ExecutionResult {
        match UiCommand::from_intent(intent) {
            Some(command) => self.ui.perform(&command).await,
            None => ExecutionResult::failure(format!(
                "incomplete {} command: \"{}\"",
                intent.intent_type, intent.raw_text
            )),
        }
    }

    async fn build_and_run(&self, command: &str) -> ExecutionResult {
        match self.builder.build_workflow_from_command(command, None).await {
            Ok(built) => built.execute(None).await,
            Err(e) => ExecutionResult::failure(e.to_string()),
        }
    }

    fn help(&self) -> ExecutionResult {
        let mut phrases: Vec<String> = Vec::new();
        let catalog = self.builder.executor().actions().catalog();
        for component in catalog.voice_interactable_components() {
            for action in component.actions.iter().flatten() {
                let phrase = action
                    .voice_commands
                    .first()
                    .cloned()
                    .unwrap_or_else(|| action.label.to_lowercase());
                if !phrases.contains(&phrase) {
                    phrases.push(phrase);
                }
            }
        }
        for workflow in self.workflows.list() {
            if let Some(phrase) = workflow.trigger_phrases.first()
                && !phrases.contains(phrase)
            {
                phrases.push(phrase.clone());
            }
        }

        if phrases.is_empty() {
            return ExecutionResult::ok("No voice commands are available right now.");
        }
        ExecutionResult::ok(format!("You can say: {}.", phrases.join(", ")))
            .with_data(json!({ "commands": phrases }))
    }
}

impl std::fmt::Debug for VoiceCommandExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceCommandExecutor")
            .field("workflows", &self.workflows.len())
            .field("announcer", &self.announcer.is_some())
            .finish_non_exhaustive()
    }
}

/// Whether a result asks the listener to stop.
pub fn is_stop(result: &ExecutionResult) -> bool {
    result
        .data
        .as_ref()
        .and_then(|d| d.get("stop"))
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false)
}

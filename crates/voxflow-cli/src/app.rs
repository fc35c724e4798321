//! Service wiring.
//!
//! Builds the whole voice pipeline from a [`VoxflowConfig`] plus the host
//! ports (confirmation, UI, speech, planner). Every service is constructed
//! here and shared through `Arc`.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use voxflow_actions::{
    ActionCatalog, ActionExecutor, ActionMatcher, ActionRegistry, ConfirmationGate,
};
use voxflow_intent::IntentParser;
use voxflow_llm::LlmClient;
use voxflow_speech::{Announcer, SpeechSink};
use voxflow_voice::{UiBridge, VoiceCommandExecutor};
use voxflow_workflow::{
    LlmStepPlanner, StepPlanner, WorkflowBuilder, WorkflowExecutor, WorkflowRegistry,
};

use crate::catalog::build_registry;
use crate::config::{LlmSection, VoxflowConfig};

/// Host-provided collaborators.
pub struct Ports {
    pub gate: Arc<dyn ConfirmationGate>,
    pub ui: Arc<dyn UiBridge>,
    pub sink: Arc<dyn SpeechSink>,
    pub planner: Option<Arc<dyn StepPlanner>>,
}

/// The assembled pipeline.
pub struct App {
    pub registry: ActionRegistry,
    pub matcher: ActionMatcher,
    pub voice: VoiceCommandExecutor,
}

/// Intent parser with the configured custom intents appended.
pub fn build_parser(config: &VoxflowConfig) -> Result<IntentParser> {
    let mut parser = IntentParser::new();
    for custom in &config.intents {
        parser
            .register_custom(custom.clone())
            .with_context(|| format!("invalid custom intent `{}`", custom.name))?;
    }
    Ok(parser)
}

/// Static workflows from `[[workflows]]`.
pub fn build_workflows(config: &VoxflowConfig) -> Result<WorkflowRegistry> {
    let mut registry = WorkflowRegistry::new();
    for workflow in &config.workflows {
        registry
            .register(workflow.clone())
            .context("invalid [[workflows]] entry")?;
    }
    Ok(registry)
}

/// The LLM step planner, when an API key is available.
pub fn llm_planner<F>(section: &LlmSection, lookup: F) -> Result<Option<Arc<dyn StepPlanner>>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(config) = section.resolve(lookup) else {
        return Ok(None);
    };
    let (model, temperature, max_tokens) = (config.model.clone(), config.temperature, config.max_tokens);
    let client = LlmClient::new(config).context("failed to create LLM client")?;
    info!(model = %model, "LLM planner ready");

    let planner = LlmStepPlanner::new(Arc::new(client))
        .with_temperature(temperature)
        .with_max_tokens(max_tokens);
    Ok(Some(Arc::new(planner)))
}

/// Wire every service.
pub fn build_app(config: &VoxflowConfig, ports: Ports) -> Result<App> {
    let parser = build_parser(config)?;
    let workflows = build_workflows(config)?;

    let registry = build_registry(&config.components);
    let catalog: Arc<dyn ActionCatalog> = Arc::new(registry.clone());
    let announcer = Announcer::new(ports.sink, config.speech.clone());

    let actions = ActionExecutor::with_gate(Arc::clone(&catalog), ports.gate);
    let executor =
        Arc::new(WorkflowExecutor::new(actions).with_announcer(announcer.clone()));
    let matcher = ActionMatcher::with_config(catalog, config.matcher);

    let mut builder = WorkflowBuilder::new(matcher.clone(), executor);
    if let Some(planner) = ports.planner {
        builder = builder.with_llm(planner);
    }

    let voice = VoiceCommandExecutor::new(parser, matcher.clone(), builder)
        .with_workflows(Arc::new(workflows))
        .with_ui(ports.ui)
        .with_announcer(announcer);

    info!(
        components = registry.len(),
        workflows = voice.workflows().len(),
        custom_intents = config.intents.len(),
        "voice pipeline assembled"
    );

    Ok(App {
        registry,
        matcher,
        voice,
    })
}

//! One-shot subcommands: `parse`, `match`, `workflows`, `status`.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;
use voxflow_actions::ActionMatcher;
use voxflow_llm::config::{API_KEY_VARS, env_non_empty};

use crate::app::{build_parser, build_workflows};
use crate::catalog::build_registry;
use crate::config::VoxflowConfig;

/// Print the parsed intent as JSON.
pub fn cmd_parse(config: &VoxflowConfig, text: &str) -> Result<()> {
    let parser = build_parser(config)?;
    let intent = parser.parse(text);
    println!(
        "{}",
        serde_json::to_string_pretty(&intent).context("failed to serialize intent")?
    );
    Ok(())
}

/// Print the best action match, if any.
pub fn cmd_match(config: &VoxflowConfig, text: &str) -> Result<()> {
    let registry = build_registry(&config.components);
    let matcher = ActionMatcher::with_config(Arc::new(registry), config.matcher);

    match matcher.find_action_by_command(text) {
        Some(hit) => {
            let out = json!({
                "actionId": hit.action.id,
                "label": hit.action.label,
                "componentId": hit.component_id,
                "confidence": hit.confidence,
                "matchedCommand": hit.matched_command,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&out).context("failed to serialize match")?
            );
        }
        None => println!(
            "  No action matches \"{}\" (minimum confidence {:.2}).",
            text.trim(),
            config.matcher.min_confidence
        ),
    }
    Ok(())
}

/// List the configured static workflows.
pub fn cmd_workflows(config: &VoxflowConfig) -> Result<()> {
    let registry = build_workflows(config)?;
    if registry.is_empty() {
        println!("  No static workflows configured.");
        return Ok(());
    }

    println!();
    for workflow in registry.list() {
        println!("  {} ({})", workflow.name, workflow.id);
        if !workflow.description.is_empty() {
            println!("    {}", workflow.description);
        }
        println!("    triggers: {}", workflow.trigger_phrases.join(", "));
        println!("    steps:    {}", workflow.steps.len());
    }
    println!();
    Ok(())
}

/// Show configuration and credential status.
pub fn cmd_status(config: &VoxflowConfig, config_path: &Path) -> Result<()> {
    println!();
    println!("  voxflow Status");
    println!("  ==============");
    println!();

    if config_path.exists() {
        println!("  Config:           OK ({})", config_path.display());
    } else {
        println!("  Config:           MISSING, using defaults ({})", config_path.display());
    }

    let actions: usize = config.components.iter().map(|c| c.actions.len()).sum();
    println!(
        "  Catalog:          {} components, {actions} actions",
        config.components.len()
    );
    println!("  Workflows:        {}", config.workflows.len());
    println!("  Custom intents:   {}", config.intents.len());

    match config.llm.resolve(env_non_empty) {
        Some(llm) => println!("  LLM planner:      CONFIGURED ({} at {})", llm.model, llm.base_url),
        None if !config.llm.enabled => println!("  LLM planner:      DISABLED"),
        None => println!("  LLM planner:      NOT SET ({})", API_KEY_VARS.join(" / ")),
    }

    if config.speech.enabled {
        println!("  Speech output:    ON ({})", config.speech.options.lang);
    } else {
        println!("  Speech output:    OFF");
    }
    println!(
        "  Recognition:      {} ({})",
        config.recognition.lang,
        if config.recognition.continuous { "continuous" } else { "single utterance" }
    );
    println!();
    Ok(())
}

//! Demo action catalog built from `[[components]]`.
//!
//! The CLI has no real UI behind its actions, so every handler just logs the
//! invocation and echoes it back as result data.

use serde_json::json;
use voxflow_actions::{ActionItem, ActionRegistry, ComponentConfig, handler_fn};

use crate::config::{ActionSpec, ComponentSpec};

/// Register every configured component into a fresh registry.
pub fn build_registry(specs: &[ComponentSpec]) -> ActionRegistry {
    let registry = ActionRegistry::new();
    for spec in specs {
        registry.register_component(component(spec));
    }
    registry
}

fn component(spec: &ComponentSpec) -> ComponentConfig {
    let mut config = ComponentConfig::new(&spec.id, &spec.name);
    if let Some(description) = &spec.description {
        config = config.with_description(description);
    }
    if let Some(interactable) = spec.voice_interactable {
        config = config.with_voice_interactable(interactable);
    }
    for action in &spec.actions {
        config = config.with_action(action_item(&spec.id, action));
    }
    config
}

fn action_item(component_id: &str, spec: &ActionSpec) -> ActionItem {
    let component_id = component_id.to_owned();
    let action_id = spec.id.clone();

    let handler = handler_fn(move |params| {
        let component_id = component_id.clone();
        let action_id = action_id.clone();
        async move {
            tracing::info!(%component_id, %action_id, %params, "demo action invoked");
            Ok(Some(json!({
                "componentId": component_id,
                "actionId": action_id,
                "params": params,
            })))
        }
    });

    let mut item = ActionItem::new(&spec.id, &spec.label, handler)
        .with_voice_commands(spec.voice_commands.iter().cloned());
    if let Some(key) = &spec.i18n_key {
        item = item.with_i18n_key(key);
    }
    if spec.confirmation_required {
        item = item.requires_confirmation();
    }
    item
}

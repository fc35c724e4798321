//! Catalog value types: components, action items, metadata and results.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::handler::ActionHandler;

// ---------------------------------------------------------------------------
// Action items and components
// ---------------------------------------------------------------------------

/// A registered, invokable UI operation.
///
/// Owned by the hosting UI; this crate only ever reads it.
#[derive(Clone)]
pub struct ActionItem {
    pub id: String,
    pub label: String,
    pub i18n_key: Option<String>,
    pub voice_commands: Vec<String>,
    pub confirmation_required: bool,
    pub handler: Arc<dyn ActionHandler>,
}

impl ActionItem {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        handler: impl ActionHandler + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            i18n_key: None,
            voice_commands: Vec::new(),
            confirmation_required: false,
            handler: Arc::new(handler),
        }
    }

    /// Add a single voice command phrase.
    pub fn with_voice_command(mut self, command: impl Into<String>) -> Self {
        self.voice_commands.push(command.into());
        self
    }

    /// Add several voice command phrases.
    pub fn with_voice_commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.voice_commands
            .extend(commands.into_iter().map(Into::into));
        self
    }

    pub fn with_i18n_key(mut self, key: impl Into<String>) -> Self {
        self.i18n_key = Some(key.into());
        self
    }

    /// Mark this action as requiring explicit confirmation before it runs.
    pub fn requires_confirmation(mut self) -> Self {
        self.confirmation_required = true;
        self
    }
}

impl fmt::Debug for ActionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionItem")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("i18n_key", &self.i18n_key)
            .field("voice_commands", &self.voice_commands)
            .field("confirmation_required", &self.confirmation_required)
            .finish_non_exhaustive()
    }
}

/// A UI component that exposes voice-addressable actions.
#[derive(Debug, Clone)]
pub struct ComponentConfig {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// `None` means the component never declared an action list.
    pub actions: Option<Vec<ActionItem>>,
    /// `Some(false)` explicitly opts the component out of voice control.
    pub voice_interactable: Option<bool>,
}

impl ComponentConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            actions: None,
            voice_interactable: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append an action, creating the action list if needed.
    pub fn with_action(mut self, action: ActionItem) -> Self {
        self.actions.get_or_insert_with(Vec::new).push(action);
        self
    }

    pub fn with_voice_interactable(mut self, interactable: bool) -> Self {
        self.voice_interactable = Some(interactable);
        self
    }

    /// Whether the component has not been explicitly marked non-interactable.
    pub fn is_voice_interactable(&self) -> bool {
        self.voice_interactable != Some(false)
    }

    /// Look up an action by id.
    pub fn action(&self, action_id: &str) -> Option<&ActionItem> {
        self.actions
            .as_deref()
            .and_then(|actions| actions.iter().find(|a| a.id == action_id))
    }
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Flattened, serializable projection of an action plus its owning component.
///
/// Recomputed on every catalog query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMetadata {
    pub action_id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i18n_key: Option<String>,
    pub voice_commands: Vec<String>,
    pub confirmation_required: bool,
    pub component_id: String,
    pub component_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_description: Option<String>,
}

impl ActionMetadata {
    pub fn from_parts(component: &ComponentConfig, action: &ActionItem) -> Self {
        Self {
            action_id: action.id.clone(),
            label: action.label.clone(),
            i18n_key: action.i18n_key.clone(),
            voice_commands: action.voice_commands.clone(),
            confirmation_required: action.confirmation_required,
            component_id: component.id.clone(),
            component_name: component.name.clone(),
            component_description: component.description.clone(),
        }
    }
}

/// The winning candidate of a command match. Never cached.
#[derive(Debug, Clone)]
pub struct ActionMatch {
    pub action: ActionItem,
    pub component_id: String,
    pub component: ComponentConfig,
    pub confidence: f64,
    pub matched_command: String,
}

// ---------------------------------------------------------------------------
// Execution result
// ---------------------------------------------------------------------------

/// Uniform outcome of every execution path (actions, workflows, commands).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The message on success, the error otherwise.
    pub fn summary(&self) -> &str {
        let text = if self.success {
            self.message.as_deref()
        } else {
            self.error.as_deref()
        };
        text.unwrap_or_default()
    }
}

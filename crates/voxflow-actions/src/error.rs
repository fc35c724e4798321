//! Action layer error types.
//!
//! These never escape [`crate::ActionExecutor::execute_action`]; they are
//! rendered into [`crate::ExecutionResult::error`] at that boundary.

/// Unified error type for the action layer.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    // -- Lookup errors -------------------------------------------------------
    /// No component with this id is registered.
    #[error("component not found: {component_id}")]
    ComponentNotFound { component_id: String },

    /// The component is registered but exposes no action list.
    #[error("component `{component_id}` has no actions")]
    NoActions { component_id: String },

    /// The component does not expose an action with this id.
    #[error("action `{action_id}` not found in component `{component_id}`")]
    ActionNotFound {
        action_id: String,
        component_id: String,
    },

    // -- Handler errors ------------------------------------------------------
    /// The bound handler returned an error.
    #[error("action handler failed: {reason}")]
    HandlerFailed { reason: String },

    /// The bound handler panicked.
    #[error("action handler for `{action_id}` panicked")]
    HandlerPanicked { action_id: String },

    // -- Confirmation --------------------------------------------------------
    /// The action requires confirmation and it was not granted.
    #[error("action `{action_id}` was not confirmed")]
    NotConfirmed { action_id: String },

    // -- Serialization -------------------------------------------------------
    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ActionError {
    /// Shorthand for [`ActionError::HandlerFailed`], for use inside handlers.
    pub fn handler(reason: impl Into<String>) -> Self {
        Self::HandlerFailed {
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the actions crate.
pub type Result<T> = std::result::Result<T, ActionError>;

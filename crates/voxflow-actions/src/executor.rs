//! Action execution.
//!
//! [`ActionExecutor::execute_action`] is a result boundary: lookup failures,
//! confirmation rejections, handler errors and handler panics all come back
//! as a failed [`ExecutionResult`], never as an error or an unwind.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;

use crate::confirmation::{AutoApprove, ConfirmationGate, ConfirmationRequest};
use crate::error::{ActionError, Result};
use crate::registry::ActionCatalog;
use crate::types::{ActionItem, ExecutionResult};

/// Invokes registered action handlers by id.
#[derive(Clone)]
pub struct ActionExecutor {
    catalog: Arc<dyn ActionCatalog>,
    gate: Arc<dyn ConfirmationGate>,
}

impl ActionExecutor {
    /// Executor that auto-approves confirmation-required actions.
    pub fn new(catalog: Arc<dyn ActionCatalog>) -> Self {
        Self::with_gate(catalog, Arc::new(AutoApprove))
    }

    pub fn with_gate(catalog: Arc<dyn ActionCatalog>, gate: Arc<dyn ConfirmationGate>) -> Self {
        Self { catalog, gate }
    }

    /// Run `action_id` on `component_id` with optional parameters.
    pub async fn execute_action(
        &self,
        action_id: &str,
        component_id: &str,
        params: Option<Value>,
    ) -> ExecutionResult {
        let action = match self.resolve(action_id, component_id) {
            Ok(action) => action,
            Err(e) => {
                tracing::warn!(action_id, component_id, error = %e, "action lookup failed");
                return ExecutionResult::failure(e.to_string());
            }
        };

        match self.invoke(&action, component_id, params).await {
            Ok(data) => {
                tracing::info!(action_id, component_id, "action executed");
                let result = ExecutionResult::ok(format!("Executed {}", action.label));
                match data {
                    Some(data) => result.with_data(data),
                    None => result,
                }
            }
            Err(e) => {
                tracing::warn!(action_id, component_id, error = %e, "action failed");
                ExecutionResult::failure(e.to_string())
            }
        }
    }

    /// Whether the action exists and its component accepts voice control.
    pub fn validate_action(&self, action_id: &str, component_id: &str) -> bool {
        self.catalog
            .component_config(component_id)
            .is_some_and(|c| c.is_voice_interactable() && c.action(action_id).is_some())
    }

    pub fn catalog(&self) -> &Arc<dyn ActionCatalog> {
        &self.catalog
    }

    fn resolve(&self, action_id: &str, component_id: &str) -> Result<ActionItem> {
        let component = self.catalog.component_config(component_id).ok_or_else(|| {
            ActionError::ComponentNotFound {
                component_id: component_id.to_string(),
            }
        })?;

        let actions = component
            .actions
            .as_deref()
            .ok_or_else(|| ActionError::NoActions {
                component_id: component_id.to_string(),
            })?;

        actions
            .iter()
            .find(|a| a.id == action_id)
            .cloned()
            .ok_or_else(|| ActionError::ActionNotFound {
                action_id: action_id.to_string(),
                component_id: component_id.to_string(),
            })
    }

    async fn invoke(
        &self,
        action: &ActionItem,
        component_id: &str,
        params: Option<Value>,
    ) -> Result<Option<Value>> {
        if action.confirmation_required {
            let request = ConfirmationRequest::new(&action.id, component_id, &action.label);
            if !self.gate.confirm(&request).await.is_approved() {
                return Err(ActionError::NotConfirmed {
                    action_id: action.id.clone(),
                });
            }
        }

        let handler = Arc::clone(&action.handler);
        let params = params.unwrap_or(Value::Null);

        AssertUnwindSafe(handler.invoke(params))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                Err(ActionError::HandlerPanicked {
                    action_id: action.id.clone(),
                })
            })
    }
}

impl std::fmt::Debug for ActionExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionExecutor").finish_non_exhaustive()
    }
}

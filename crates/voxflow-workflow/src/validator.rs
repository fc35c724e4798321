//! Structural validation of step lists.

use std::collections::HashSet;

use voxflow_actions::ActionExecutor;

use crate::types::{StepType, ValidationReport, WorkflowStep};

/// Check that `steps` form a runnable workflow.
///
/// A workflow is invalid when it is empty, when step ids repeat, or when an
/// `action` step lacks `actionId` / `componentId` or names an action that
/// [`ActionExecutor::validate_action`] rejects.
pub fn validate_workflow(steps: &[WorkflowStep], actions: &ActionExecutor) -> ValidationReport {
    let mut errors = Vec::new();

    if steps.is_empty() {
        errors.push("workflow has no steps".to_owned());
    }

    let mut seen = HashSet::new();
    for (index, step) in steps.iter().enumerate() {
        let label = if step.id.is_empty() {
            format!("#{}", index + 1)
        } else {
            step.id.clone()
        };

        if !step.id.is_empty() && !seen.insert(step.id.as_str()) {
            errors.push(format!("step {label}: duplicate step id"));
        }

        if step.step_type != StepType::Action {
            continue;
        }

        let action_id = step.action_id.as_deref().filter(|s| !s.is_empty());
        let component_id = step.component_id.as_deref().filter(|s| !s.is_empty());

        match (action_id, component_id) {
            (None, _) => errors.push(format!("step {label}: action step is missing actionId")),
            (_, None) => errors.push(format!("step {label}: action step is missing componentId")),
            (Some(action), Some(component)) => {
                if !actions.validate_action(action, component) {
                    errors.push(format!(
                        "step {label}: action `{action}` on component `{component}` is not available"
                    ));
                }
            }
        }
    }

    if !errors.is_empty() {
        tracing::debug!(errors = ?errors, "workflow failed validation");
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

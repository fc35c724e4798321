//! Sequential workflow execution.
//!
//! Steps run strictly in array order. The first failing step halts the run
//! and the failure is reported as `Step <id> failed: <reason>`.

use std::time::Duration;

use serde_json::{Map, Value, json};
use voxflow_actions::{ActionExecutor, ExecutionResult};
use voxflow_speech::Announcer;

use crate::types::{StepType, WorkflowDefinition, WorkflowStep};

/// Wait duration used when a `wait` step has no `duration` parameter.
pub const DEFAULT_WAIT_MS: u64 = 1000;

/// Runs workflow definitions against the action layer.
#[derive(Debug, Clone)]
pub struct WorkflowExecutor {
    actions: ActionExecutor,
    announcer: Option<Announcer>,
}

impl WorkflowExecutor {
    pub fn new(actions: ActionExecutor) -> Self {
        Self {
            actions,
            announcer: None,
        }
    }

    /// Route `speak` steps through `announcer`.
    pub fn with_announcer(mut self, announcer: Announcer) -> Self {
        self.announcer = Some(announcer);
        self
    }

    pub fn actions(&self) -> &ActionExecutor {
        &self.actions
    }

    /// Execute every step of `workflow` in order.
    ///
    /// `params` is the base parameter object; a step's own `params` override
    /// it key by key.
    pub async fn execute(&self, workflow: &WorkflowDefinition, params: Option<Value>) -> ExecutionResult {
        tracing::info!(
            workflow_id = %workflow.id,
            name = %workflow.name,
            steps = workflow.steps.len(),
            "starting workflow execution"
        );

        for (index, step) in workflow.steps.iter().enumerate() {
            tracing::debug!(
                workflow_id = %workflow.id,
                step = index,
                step_id = %step.id,
                step_type = ?step.step_type,
                "executing workflow step"
            );

            let merged = merge_params(params.as_ref(), step.params.as_ref());
            if let Err(reason) = self.run_step(step, merged).await {
                tracing::warn!(
                    workflow_id = %workflow.id,
                    step_id = %step.id,
                    reason = %reason,
                    "workflow step failed"
                );
                return ExecutionResult::failure(format!("Step {} failed: {reason}", step.id));
            }
        }

        tracing::info!(workflow_id = %workflow.id, "workflow completed");
        ExecutionResult::ok("Workflow executed successfully").with_data(json!({
            "workflowId": workflow.id,
            "stepsExecuted": workflow.steps.len(),
        }))
    }

    async fn run_step(&self, step: &WorkflowStep, params: Option<Value>) -> Result<(), String> {
        match step.step_type {
            StepType::Action => {
                let (Some(action_id), Some(component_id)) =
                    (step.action_id.as_deref(), step.component_id.as_deref())
                else {
                    return Err("action step is missing actionId or componentId".into());
                };
                let result = self
                    .actions
                    .execute_action(action_id, component_id, params)
                    .await;
                if result.success {
                    Ok(())
                } else {
                    Err(result
                        .error
                        .unwrap_or_else(|| "action reported failure".into()))
                }
            }
            StepType::Speak => {
                if let (Some(message), Some(announcer)) = (&step.message, &self.announcer) {
                    announcer.announce(message).await;
                }
                Ok(())
            }
            StepType::Wait => {
                let ms = wait_duration(params.as_ref())?;
                tokio::time::sleep(Duration::from_millis(ms)).await;
                Ok(())
            }
            StepType::Condition | StepType::Loop => Ok(()),
        }
    }
}

/// Shallow-merge two parameter objects, `overlay` winning per key.
fn merge_params(base: Option<&Value>, overlay: Option<&Value>) -> Option<Value> {
    match (base, overlay) {
        (None, None) => None,
        (Some(v), None) | (None, Some(v)) => Some(v.clone()),
        (Some(Value::Object(base)), Some(Value::Object(overlay))) => {
            let mut merged: Map<String, Value> = base.clone();
            merged.extend(overlay.iter().map(|(k, v)| (k.clone(), v.clone())));
            Some(Value::Object(merged))
        }
        (Some(_), Some(overlay)) => Some(overlay.clone()),
    }
}

fn wait_duration(params: Option<&Value>) -> Result<u64, String> {
    match params.and_then(|p| p.get("duration")) {
        None | Some(Value::Null) => Ok(DEFAULT_WAIT_MS),
        Some(v) => v
            .as_u64()
            .ok_or_else(|| format!("invalid wait duration: {v}")),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use voxflow_actions::{ActionError, ActionItem, ActionRegistry, ComponentConfig, handler_fn};

    use super::*;

    fn workflow(steps: Vec<WorkflowStep>) -> WorkflowDefinition {
        WorkflowDefinition {
            id: "wf-test".into(),
            name: "test".into(),
            description: String::new(),
            trigger_phrases: vec![],
            steps,
        }
    }

    fn executor_with(items: Vec<ActionItem>) -> WorkflowExecutor {
        let registry = ActionRegistry::new();
        let component = items
            .into_iter()
            .fold(ComponentConfig::new("form1", "Form"), ComponentConfig::with_action);
        registry.register_component(component);
        WorkflowExecutor::new(ActionExecutor::new(Arc::new(registry)))
    }

    #[test]
    fn step_params_override_call_params() {
        let merged = merge_params(
            Some(&json!({"a": 1, "b": 2})),
            Some(&json!({"b": 3, "c": 4})),
        )
        .unwrap();
        assert_eq!(merged, json!({"a": 1, "b": 3, "c": 4}));
        assert_eq!(merge_params(None, None), None);
        assert_eq!(merge_params(Some(&json!({"a": 1})), None), Some(json!({"a": 1})));
    }

    #[test]
    fn wait_duration_defaults_and_rejects_garbage() {
        assert_eq!(wait_duration(None), Ok(DEFAULT_WAIT_MS));
        assert_eq!(wait_duration(Some(&json!({"duration": 20}))), Ok(20));
        assert!(wait_duration(Some(&json!({"duration": "soon"}))).is_err());
    }

    #[tokio::test]
    async fn steps_run_in_order_and_succeed() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let item = |id: &'static str| {
            let order = Arc::clone(&order);
            ActionItem::new(
                id,
                id,
                handler_fn(move |_| {
                    let order = Arc::clone(&order);
                    async move {
                        order.lock().unwrap().push(id);
                        Ok(None)
                    }
                }),
            )
        };
        let exec = executor_with(vec![item("first"), item("second")]);

        let wf = workflow(vec![
            WorkflowStep::action("s1", "first", "form1"),
            WorkflowStep::condition("s2", "ignored"),
            WorkflowStep::action("s3", "second", "form1"),
        ]);
        let result = exec.execute(&wf, None).await;
        assert!(result.success);
        assert_eq!(result.message.as_deref(), Some("Workflow executed successfully"));
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn failing_action_halts_execution() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = {
            let calls = Arc::clone(&calls);
            ActionItem::new(
                "after",
                "After",
                handler_fn(move |_| {
                    let calls = Arc::clone(&calls);
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(None)
                    }
                }),
            )
        };
        let failing = ActionItem::new(
            "fail",
            "Fail",
            handler_fn(|_| async { Err(ActionError::handler("printer jammed")) }),
        );
        let exec = executor_with(vec![failing, counted]);

        let wf = workflow(vec![
            WorkflowStep::action("s1", "fail", "form1"),
            WorkflowStep::action("s2", "after", "form1"),
        ]);
        let result = exec.execute(&wf, None).await;
        assert!(!result.success);
        let error = result.error.unwrap();
        assert!(error.starts_with("Step s1 failed:"));
        assert!(error.contains("printer jammed"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn call_params_reach_actions() {
        let item = ActionItem::new(
            "echo",
            "Echo",
            handler_fn(|params: serde_json::Value| async move {
                if params["mrn"] == "42" && params["mode"] == "fast" {
                    Ok(None)
                } else {
                    Err(ActionError::handler(format!("unexpected params {params}")))
                }
            }),
        );
        let exec = executor_with(vec![item]);
        let wf = workflow(vec![
            WorkflowStep::action("s1", "echo", "form1").with_params(json!({"mode": "fast"})),
        ]);
        let result = exec.execute(&wf, Some(json!({"mrn": "42", "mode": "slow"}))).await;
        assert!(result.success, "{:?}", result.error);
    }

    #[tokio::test]
    async fn wait_delays_completion() {
        let exec = executor_with(vec![]);
        let wf = workflow(vec![
            WorkflowStep::wait("w", 50),
            WorkflowStep::speak("s", "done"),
        ]);
        let started = std::time::Instant::now();
        let result = exec.execute(&wf, None).await;
        assert!(result.success);
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn invalid_wait_fails_step() {
        let exec = executor_with(vec![]);
        let wf = workflow(vec![
            WorkflowStep::wait("w", 0).with_params(json!({"duration": -5})),
        ]);
        let result = exec.execute(&wf, None).await;
        assert!(result.error.unwrap().starts_with("Step w failed: invalid wait duration"));
    }
}

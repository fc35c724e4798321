//! Build workflows from spoken commands.
//!
//! The LLM planner is tried first when one is configured. Any LLM failure,
//! unparsable reply or empty plan drops to the deterministic fallback. The
//! result is validated before it is handed back; a validation failure is the
//! only error this module returns.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;
use voxflow_actions::{ActionMatcher, ExecutionResult};

use crate::error::{Result, WorkflowError};
use crate::executor::WorkflowExecutor;
use crate::planner::{FallbackPlanner, StepPlanner};
use crate::types::{ComponentSummary, PlanRequest, PlanSource, WorkflowDefinition, WorkflowStep};
use crate::validator::validate_workflow;

/// A workflow ready to run, bound to the executor that will run it.
#[derive(Debug, Clone)]
pub struct BuiltWorkflow {
    pub definition: WorkflowDefinition,
    pub source: PlanSource,
    executor: Arc<WorkflowExecutor>,
}

impl BuiltWorkflow {
    /// Bind an existing definition to an executor.
    pub fn bind(
        definition: WorkflowDefinition,
        source: PlanSource,
        executor: Arc<WorkflowExecutor>,
    ) -> Self {
        Self {
            definition,
            source,
            executor,
        }
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn steps(&self) -> &[WorkflowStep] {
        &self.definition.steps
    }

    /// Run the workflow.
    pub async fn execute(&self, params: Option<Value>) -> ExecutionResult {
        self.executor.execute(&self.definition, params).await
    }
}

/// Turns commands into validated [`BuiltWorkflow`]s.
#[derive(Clone)]
pub struct WorkflowBuilder {
    executor: Arc<WorkflowExecutor>,
    fallback: FallbackPlanner,
    llm: Option<Arc<dyn StepPlanner>>,
}

impl WorkflowBuilder {
    /// Builder that only uses the deterministic fallback.
    pub fn new(matcher: ActionMatcher, executor: Arc<WorkflowExecutor>) -> Self {
        Self {
            executor,
            fallback: FallbackPlanner::new(matcher),
            llm: None,
        }
    }

    /// Try `planner` before falling back.
    pub fn with_llm(mut self, planner: Arc<dyn StepPlanner>) -> Self {
        self.llm = Some(planner);
        self
    }

    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    pub fn executor(&self) -> &Arc<WorkflowExecutor> {
        &self.executor
    }

    /// Plan, normalize and validate a workflow for `command`.
    pub async fn build_workflow_from_command(
        &self,
        command: &str,
        context: Option<&str>,
    ) -> Result<BuiltWorkflow> {
        let request = self.plan_request(command, context);
        let (steps, source) = self.plan(&request).await?;
        let steps = normalize_step_ids(steps);

        let report = validate_workflow(&steps, self.executor.actions());
        if !report.valid {
            tracing::warn!(command = %command, errors = ?report.errors, "built workflow is invalid");
            return Err(WorkflowError::Invalid {
                errors: report.errors,
            });
        }

        let definition = WorkflowDefinition {
            id: format!("wf-{}", Uuid::now_v7()),
            name: command.trim().to_owned(),
            description: format!("Generated from voice command \"{}\"", command.trim()),
            trigger_phrases: vec![command.trim().to_owned()],
            steps,
        };

        tracing::info!(
            workflow_id = %definition.id,
            source = ?source,
            steps = definition.steps.len(),
            "workflow built"
        );

        Ok(BuiltWorkflow::bind(definition, source, Arc::clone(&self.executor)))
    }

    fn plan_request(&self, command: &str, context: Option<&str>) -> PlanRequest {
        let catalog = self.executor.actions().catalog();
        PlanRequest {
            user_command: command.trim().to_owned(),
            context: context.map(str::to_owned),
            available_actions: catalog.all_action_items(),
            components: catalog
                .voice_interactable_components()
                .iter()
                .map(ComponentSummary::from)
                .collect(),
        }
    }

    async fn plan(&self, request: &PlanRequest) -> Result<(Vec<WorkflowStep>, PlanSource)> {
        if let Some(llm) = &self.llm {
            match llm.plan(request).await {
                Ok(steps) if !steps.is_empty() => return Ok((steps, PlanSource::Llm)),
                Ok(_) => {
                    tracing::warn!(command = %request.user_command, "LLM returned no steps, using fallback");
                }
                Err(e) => {
                    tracing::warn!(command = %request.user_command, error = %e, "LLM planning failed, using fallback");
                }
            }
        }
        let steps = self.fallback.plan(request).await?;
        Ok((steps, PlanSource::Fallback))
    }
}

impl std::fmt::Debug for WorkflowBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowBuilder")
            .field("has_llm", &self.has_llm())
            .finish_non_exhaustive()
    }
}

/// Give every step without an id a positional one (`step-<n>`), skipping
/// numbers already taken by explicit ids.
fn normalize_step_ids(mut steps: Vec<WorkflowStep>) -> Vec<WorkflowStep> {
    let mut taken: HashSet<String> = steps
        .iter()
        .filter(|s| !s.id.trim().is_empty())
        .map(|s| s.id.clone())
        .collect();

    for (index, step) in steps.iter_mut().enumerate() {
        if !step.id.trim().is_empty() {
            continue;
        }
        let mut n = index + 1;
        let mut id = format!("step-{n}");
        while taken.contains(&id) {
            n += 1;
            id = format!("step-{n}");
        }
        taken.insert(id.clone());
        step.id = id;
    }
    steps
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use voxflow_actions::{ActionExecutor, ActionItem, ActionRegistry, ComponentConfig, handler_fn};

    use super::*;
    use crate::types::StepType;

    struct FixedPlanner(Result<Vec<WorkflowStep>>);

    #[async_trait]
    impl StepPlanner for FixedPlanner {
        async fn plan(&self, _request: &PlanRequest) -> Result<Vec<WorkflowStep>> {
            match &self.0 {
                Ok(steps) => Ok(steps.clone()),
                Err(e) => Err(WorkflowError::PlanningFailed {
                    reason: e.to_string(),
                }),
            }
        }
    }

    fn builder() -> WorkflowBuilder {
        let registry = ActionRegistry::new();
        registry.register_component(ComponentConfig::new("form1", "Form").with_action(
            ActionItem::new("save", "Save", handler_fn(|_| async { Ok(None) }))
                .with_voice_command("save"),
        ));
        let catalog: Arc<dyn voxflow_actions::ActionCatalog> = Arc::new(registry);
        let executor = Arc::new(WorkflowExecutor::new(ActionExecutor::new(Arc::clone(&catalog))));
        WorkflowBuilder::new(ActionMatcher::new(catalog), executor)
    }

    #[tokio::test]
    async fn without_llm_uses_fallback() {
        let built = builder().build_workflow_from_command("click save", None).await.unwrap();
        assert_eq!(built.source, PlanSource::Fallback);
        assert_eq!(built.steps().len(), 1);
        assert_eq!(built.steps()[0].step_type, StepType::Action);
        assert!(built.id().starts_with("wf-"));
    }

    #[tokio::test]
    async fn llm_plan_is_used_when_valid() {
        let planner = FixedPlanner(Ok(vec![
            WorkflowStep::speak("", "Saving now"),
            WorkflowStep::action("", "save", "form1"),
        ]));
        let built = builder()
            .with_llm(Arc::new(planner))
            .build_workflow_from_command("save and confirm", None)
            .await
            .unwrap();
        assert_eq!(built.source, PlanSource::Llm);
        let ids: Vec<&str> = built.steps().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["step-1", "step-2"]);
    }

    #[tokio::test]
    async fn generated_ids_skip_explicit_ones() {
        let planner = FixedPlanner(Ok(vec![
            WorkflowStep::speak("step-2", "Saving now"),
            WorkflowStep::speak("", "Almost done"),
            WorkflowStep::action("", "save", "form1"),
        ]));
        let built = builder()
            .with_llm(Arc::new(planner))
            .build_workflow_from_command("save and confirm", None)
            .await
            .unwrap();
        assert_eq!(built.source, PlanSource::Llm);
        let ids: Vec<&str> = built.steps().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["step-2", "step-3", "step-4"]);
    }

    #[test]
    fn normalize_keeps_explicit_ids() {
        let steps = normalize_step_ids(vec![
            WorkflowStep::speak("", "a"),
            WorkflowStep::speak("step-1", "b"),
        ]);
        assert_eq!(steps[0].id, "step-2");
        assert_eq!(steps[1].id, "step-1");
    }

    #[tokio::test]
    async fn llm_error_falls_back() {
        let planner = FixedPlanner(Err(WorkflowError::PlanningFailed {
            reason: "timeout".into(),
        }));
        let built = builder()
            .with_llm(Arc::new(planner))
            .build_workflow_from_command("click save", None)
            .await
            .unwrap();
        assert_eq!(built.source, PlanSource::Fallback);
    }

    #[tokio::test]
    async fn empty_llm_plan_falls_back() {
        let built = builder()
            .with_llm(Arc::new(FixedPlanner(Ok(vec![]))))
            .build_workflow_from_command("click save", None)
            .await
            .unwrap();
        assert_eq!(built.source, PlanSource::Fallback);
    }

    #[tokio::test]
    async fn invalid_llm_plan_is_rejected() {
        let planner = FixedPlanner(Ok(vec![WorkflowStep::action("s1", "shred", "form1")]));
        let err = builder()
            .with_llm(Arc::new(planner))
            .build_workflow_from_command("shred everything", None)
            .await
            .unwrap_err();
        match err {
            WorkflowError::Invalid { errors } => assert!(errors[0].contains("shred")),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn built_workflow_executes() {
        let built = builder().build_workflow_from_command("save", None).await.unwrap();
        let result = built.execute(None).await;
        assert!(result.success);
    }
}

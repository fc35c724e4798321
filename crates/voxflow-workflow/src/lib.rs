//! Voice workflows for voxflow.
//!
//! - **[`builder`]** -- [`WorkflowBuilder`], command to validated
//!   [`BuiltWorkflow`] via the LLM planner or the deterministic fallback.
//! - **[`planner`]** -- the [`StepPlanner`] port, [`LlmStepPlanner`] and
//!   [`create_workflow_steps_fallback`].
//! - **[`validator`]** -- [`validate_workflow`].
//! - **[`executor`]** -- [`WorkflowExecutor`], strictly sequential step
//!   execution.
//! - **[`registry`]** -- [`WorkflowRegistry`] of static, trigger-phrase
//!   workflows.
//! - **[`types`]** -- steps, definitions and planner input.

pub mod builder;
pub mod error;
pub mod executor;
pub mod planner;
pub mod registry;
pub mod types;
pub mod validator;

pub use builder::{BuiltWorkflow, WorkflowBuilder};
pub use error::{Result, WorkflowError};
pub use executor::WorkflowExecutor;
pub use planner::{
    FallbackPlanner, LlmStepPlanner, StepPlanner, create_workflow_steps_fallback,
    parse_planner_reply,
};
pub use registry::WorkflowRegistry;
pub use types::{
    ComponentSummary, PlanRequest, PlanSource, StepType, ValidationReport, WorkflowDefinition,
    WorkflowStep,
};
pub use validator::validate_workflow;

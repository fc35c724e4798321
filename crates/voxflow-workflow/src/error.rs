//! Workflow error types.
//!
//! Only construction-time failures surface as [`WorkflowError`]. Execution
//! failures are reported through `ExecutionResult`.

use std::path::PathBuf;

/// Unified error type for the workflow layer.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    // -- Construction --------------------------------------------------------
    /// The built workflow failed structural validation.
    #[error("invalid workflow: {}", errors.join("; "))]
    Invalid { errors: Vec<String> },

    /// A planner could not produce steps.
    #[error("workflow planning failed: {reason}")]
    PlanningFailed { reason: String },

    // -- Registry ------------------------------------------------------------
    /// A workflow with this id is already registered.
    #[error("workflow already registered: {workflow_id}")]
    DuplicateWorkflow { workflow_id: String },

    /// Reading a workflow file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A workflow file is not valid TOML for the expected shape.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    // -- Upstream ------------------------------------------------------------
    /// The LLM backend failed.
    #[error("llm error: {0}")]
    Llm(#[from] voxflow_llm::LlmError),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the workflow crate.
pub type Result<T> = std::result::Result<T, WorkflowError>;

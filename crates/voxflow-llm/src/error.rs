//! LLM port error types.

/// Unified error type for the LLM port.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Transport failure or non-2xx response.
    #[error("llm request failed: {reason}")]
    RequestFailed { reason: String },

    /// The response body did not have the expected shape.
    #[error("llm response parse error: {reason}")]
    ParseFailed { reason: String },

    /// No API key was found in any of the supported variables.
    #[error("missing api key (checked {checked})")]
    MissingApiKey { checked: String },

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the LLM crate.
pub type Result<T> = std::result::Result<T, LlmError>;

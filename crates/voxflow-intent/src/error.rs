//! Intent parser error types.
//!
//! Parsing itself never fails; errors only surface when registering custom
//! intent patterns.

/// Unified error type for the intent parser.
#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    /// A custom intent pattern failed to compile.
    #[error("invalid intent pattern `{pattern}` for `{name}`: {reason}")]
    InvalidPattern {
        name: String,
        pattern: String,
        reason: String,
    },

    /// A custom intent was registered without a name.
    #[error("custom intent name must not be empty")]
    EmptyName,

    /// The confidence supplied for a custom intent is outside `[0, 1]`.
    #[error("confidence {confidence} for `{name}` is outside [0, 1]")]
    InvalidConfidence { name: String, confidence: f64 },
}

/// Convenience alias used throughout the intent crate.
pub type Result<T> = std::result::Result<T, IntentError>;

//! Voice intent parsing for voxflow.
//!
//! - **[`parser`]** -- [`IntentParser`], an ordered, first-match-wins regex
//!   matcher with support for custom intents.
//! - **[`patterns`]** -- the built-in pattern table and capture-group mapping.
//! - **[`types`]** -- [`Intent`] and [`IntentType`].

pub mod error;
pub mod parser;
pub mod patterns;
pub mod types;

pub use error::{IntentError, Result};
pub use parser::{CustomIntent, IntentParser};
pub use types::{Intent, IntentType};

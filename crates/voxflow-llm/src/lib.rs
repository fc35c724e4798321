//! LLM port for voxflow.
//!
//! - **[`client`]** -- the [`LlmBackend`] trait and [`LlmClient`], an
//!   OpenAI-compatible chat completion client.
//! - **[`config`]** -- [`LlmConfig`] and environment credential resolution.
//! - **[`types`]** -- chat request and message wire types.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::{LlmBackend, LlmClient, parse_completion, strip_code_fences};
pub use config::LlmConfig;
pub use error::{LlmError, Result};
pub use types::{ChatRequest, Message, Role};

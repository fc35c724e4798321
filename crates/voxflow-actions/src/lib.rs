//! Voice-addressable action layer for voxflow.
//!
//! - **[`registry`]** -- the [`ActionCatalog`] read port and the concurrent
//!   [`ActionRegistry`] the hosting UI mounts components into.
//! - **[`matcher`]** -- [`ActionMatcher`], a three-tier heuristic that maps a
//!   spoken command to the best registered action.
//! - **[`executor`]** -- [`ActionExecutor`], which runs handlers and converts
//!   every failure into an [`ExecutionResult`].
//! - **[`confirmation`]** -- async [`ConfirmationGate`]s for actions flagged
//!   as requiring confirmation.
//! - **[`handler`]** -- the [`ActionHandler`] trait and [`handler_fn`].
//! - **[`types`]** -- components, action items and result types.

pub mod confirmation;
pub mod error;
pub mod executor;
pub mod handler;
pub mod matcher;
pub mod registry;
pub mod types;

pub use confirmation::{
    AutoApprove, ConfirmationDecision, ConfirmationGate, ConfirmationRequest, PendingConfirmations,
};
pub use error::{ActionError, Result};
pub use executor::ActionExecutor;
pub use handler::{ActionHandler, FnHandler, handler_fn};
pub use matcher::{ActionMatcher, MatcherConfig};
pub use registry::{ActionCatalog, ActionRegistry};
pub use types::{ActionItem, ActionMatch, ActionMetadata, ComponentConfig, ExecutionResult};

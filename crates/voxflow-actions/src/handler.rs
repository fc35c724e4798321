//! Action handler trait and closure adapter.

use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// The invokable operation bound to an action item.
///
/// Handlers receive the (possibly `Null`) parameter object and may return a
/// JSON payload that is surfaced as `ExecutionResult::data`.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn invoke(&self, params: Value) -> Result<Option<Value>>;
}

/// Adapts an async closure into an [`ActionHandler`].
pub struct FnHandler<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> ActionHandler for FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<Value>>> + Send,
{
    async fn invoke(&self, params: Value) -> Result<Option<Value>> {
        (self.f)(params).await
    }
}

/// Wrap an async closure as a handler.
///
/// ```
/// # use voxflow_actions::handler_fn;
/// let handler = handler_fn(|_params| async { Ok(None) });
/// # let _ = handler;
/// ```
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<Value>>> + Send,
{
    FnHandler { f }
}

//! Confirmation gating for destructive actions.
//!
//! Actions flagged `confirmation_required` do not run until a
//! [`ConfirmationGate`] approves them. [`AutoApprove`] approves immediately;
//! [`PendingConfirmations`] parks each request until the hosting UI calls
//! [`PendingConfirmations::approve`] or [`PendingConfirmations::reject`].

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

/// An action waiting for user approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationRequest {
    pub id: Uuid,
    pub action_id: String,
    pub component_id: String,
    pub label: String,
    pub requested_at: DateTime<Utc>,
}

impl ConfirmationRequest {
    pub fn new(
        action_id: impl Into<String>,
        component_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            action_id: action_id.into(),
            component_id: component_id.into(),
            label: label.into(),
            requested_at: Utc::now(),
        }
    }
}

/// The outcome of a confirmation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationDecision {
    Approved,
    Rejected,
}

impl ConfirmationDecision {
    pub fn is_approved(self) -> bool {
        self == Self::Approved
    }
}

/// Decides whether a confirmation-required action may run.
#[async_trait]
pub trait ConfirmationGate: Send + Sync {
    async fn confirm(&self, request: &ConfirmationRequest) -> ConfirmationDecision;
}

// ---------------------------------------------------------------------------
// AutoApprove
// ---------------------------------------------------------------------------

/// Approves everything without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

#[async_trait]
impl ConfirmationGate for AutoApprove {
    async fn confirm(&self, request: &ConfirmationRequest) -> ConfirmationDecision {
        tracing::warn!(
            action_id = %request.action_id,
            component_id = %request.component_id,
            "confirmation required but auto-approved"
        );
        ConfirmationDecision::Approved
    }
}

// ---------------------------------------------------------------------------
// PendingConfirmations
// ---------------------------------------------------------------------------

type Waiting = HashMap<Uuid, (ConfirmationRequest, oneshot::Sender<ConfirmationDecision>)>;

/// Holds requests open until they are resolved externally or time out.
///
/// A timed-out or dropped request counts as rejected.
pub struct PendingConfirmations {
    waiting: Mutex<Waiting>,
    timeout: Duration,
    notify: Option<mpsc::UnboundedSender<ConfirmationRequest>>,
}

impl PendingConfirmations {
    pub fn new(timeout: Duration) -> Self {
        Self {
            waiting: Mutex::new(HashMap::new()),
            timeout,
            notify: None,
        }
    }

    /// Publish every new request on `tx` so a UI can prompt for it.
    pub fn with_notifier(mut self, tx: mpsc::UnboundedSender<ConfirmationRequest>) -> Self {
        self.notify = Some(tx);
        self
    }

    /// Approve a pending request. Returns `false` if it is no longer pending.
    pub fn approve(&self, id: Uuid) -> bool {
        self.resolve(id, ConfirmationDecision::Approved)
    }

    /// Reject a pending request. Returns `false` if it is no longer pending.
    pub fn reject(&self, id: Uuid) -> bool {
        self.resolve(id, ConfirmationDecision::Rejected)
    }

    /// Snapshot of the requests still waiting for a decision.
    pub fn pending(&self) -> Vec<ConfirmationRequest> {
        let mut list: Vec<ConfirmationRequest> =
            self.lock().values().map(|(req, _)| req.clone()).collect();
        list.sort_by_key(|r| r.requested_at);
        list
    }

    pub fn pending_count(&self) -> usize {
        self.lock().len()
    }

    fn resolve(&self, id: Uuid, decision: ConfirmationDecision) -> bool {
        let Some((request, tx)) = self.lock().remove(&id) else {
            return false;
        };
        tracing::info!(
            request_id = %id,
            action_id = %request.action_id,
            decision = ?decision,
            "confirmation resolved"
        );
        tx.send(decision).is_ok()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Waiting> {
        self.waiting.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Removes a request from the waiting map when `confirm` finishes or its
/// future is dropped mid-wait.
struct WaitingEntry<'a> {
    gate: &'a PendingConfirmations,
    id: Uuid,
}

impl Drop for WaitingEntry<'_> {
    fn drop(&mut self) {
        if self.gate.lock().remove(&self.id).is_some() {
            tracing::debug!(request_id = %self.id, "confirmation abandoned");
        }
    }
}

#[async_trait]
impl ConfirmationGate for PendingConfirmations {
    async fn confirm(&self, request: &ConfirmationRequest) -> ConfirmationDecision {
        let (tx, rx) = oneshot::channel();
        self.lock().insert(request.id, (request.clone(), tx));
        let _entry = WaitingEntry {
            gate: self,
            id: request.id,
        };

        if let Some(notify) = &self.notify
            && notify.send(request.clone()).is_err()
        {
            tracing::debug!(request_id = %request.id, "confirmation listener gone");
        }

        tracing::info!(
            request_id = %request.id,
            action_id = %request.action_id,
            timeout_ms = self.timeout.as_millis() as u64,
            "awaiting confirmation"
        );

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(decision)) => decision,
            Ok(Err(_)) => ConfirmationDecision::Rejected,
            Err(_) => {
                tracing::warn!(request_id = %request.id, "confirmation timed out");
                ConfirmationDecision::Rejected
            }
        }
    }
}

impl std::fmt::Debug for PendingConfirmations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingConfirmations")
            .field("pending", &self.pending_count())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn request() -> ConfirmationRequest {
        ConfirmationRequest::new("delete", "grid", "Delete row")
    }

    #[tokio::test]
    async fn auto_approve_approves() {
        let decision = AutoApprove.confirm(&request()).await;
        assert!(decision.is_approved());
    }

    #[tokio::test]
    async fn approve_resolves_waiting_request() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let gate = Arc::new(PendingConfirmations::new(Duration::from_secs(5)).with_notifier(tx));

        let waiter = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move { gate.confirm(&request()).await })
        };

        let pending = rx.recv().await.unwrap();
        assert_eq!(pending.action_id, "delete");
        assert_eq!(gate.pending_count(), 1);
        assert!(gate.approve(pending.id));

        assert_eq!(waiter.await.unwrap(), ConfirmationDecision::Approved);
        assert_eq!(gate.pending_count(), 0);
        assert!(!gate.approve(pending.id));
    }

    #[tokio::test]
    async fn reject_resolves_waiting_request() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let gate = Arc::new(PendingConfirmations::new(Duration::from_secs(5)).with_notifier(tx));

        let waiter = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move { gate.confirm(&request()).await })
        };

        let pending = rx.recv().await.unwrap();
        assert_eq!(gate.pending()[0].id, pending.id);
        assert!(gate.reject(pending.id));
        assert_eq!(waiter.await.unwrap(), ConfirmationDecision::Rejected);
    }

    #[tokio::test]
    async fn timeout_rejects_and_clears() {
        let gate = PendingConfirmations::new(Duration::from_millis(20));
        let decision = gate.confirm(&request()).await;
        assert_eq!(decision, ConfirmationDecision::Rejected);
        assert_eq!(gate.pending_count(), 0);
    }

    #[test]
    fn request_ids_are_unique() {
        assert_ne!(request().id, request().id);
    }

    #[tokio::test]
    async fn dropped_wait_clears_entry() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let gate = Arc::new(PendingConfirmations::new(Duration::from_secs(60)).with_notifier(tx));

        let waiter = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move { gate.confirm(&request()).await })
        };

        let pending = rx.recv().await.unwrap();
        assert_eq!(gate.pending_count(), 1);

        waiter.abort();
        assert!(waiter.await.unwrap_err().is_cancelled());
        assert_eq!(gate.pending_count(), 0);
        assert!(!gate.approve(pending.id));
    }

    #[tokio::test]
    async fn caller_timeout_clears_entry() {
        let gate = PendingConfirmations::new(Duration::from_secs(60));
        let outer = tokio::time::timeout(Duration::from_millis(20), gate.confirm(&request())).await;
        assert!(outer.is_err());
        assert_eq!(gate.pending_count(), 0);
    }
}

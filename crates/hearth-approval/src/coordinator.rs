//! The approval coordinator.
//!
//! Owns every in-flight approval request and runs the wait loop that
//! turns channel replies into outcomes. One coordinator, shared by
//! `Arc`, serves all concurrently gated actions; the pending table is
//! the only shared mutable state and its lock is never held across an
//! await.
//!
//! # Fail-open vs fail-closed
//!
//! A coordinator without a channel approves everything immediately (a
//! lab that never configured Telegram must not wedge). A coordinator
//! with a channel that times out or errors rejects. This asymmetry is
//! deliberate: absence of the feature is consent, failure of the
//! feature is not.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use hearth_audit::Approver;
use hearth_core::Severity;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::channel::{ApprovalChannel, ChannelDecision};
use crate::request::{ApprovalRequest, RequestId, RequestState};

/// Default wait for a human decision.
pub const DEFAULT_APPROVAL_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Cadence at which the channel is polled for decisions.
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// The final word on one approval request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalOutcome {
    /// Whether the action may run.
    pub approved: bool,
    /// How long the decision took. Zero for the no-channel fast path.
    pub response_time: Duration,
    /// Who or what decided, exactly as it will appear in the audit log.
    pub approver: Approver,
    /// Human-readable explanation of the outcome.
    pub reason: String,
}

impl ApprovalOutcome {
    fn approve(approver: Approver, reason: impl Into<String>, response_time: Duration) -> Self {
        Self {
            approved: true,
            response_time,
            approver,
            reason: reason.into(),
        }
    }

    fn reject(approver: Approver, reason: impl Into<String>, response_time: Duration) -> Self {
        Self {
            approved: false,
            response_time,
            approver,
            reason: reason.into(),
        }
    }

    /// Whether the action may run.
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.approved
    }
}

/// A request the coordinator is still waiting on.
struct PendingApproval {
    request: ApprovalRequest,
    state: RequestState,
}

/// Removes the pending entry when the wait ends, including when the
/// waiting task is cancelled mid-flight.
struct PendingGuard<'a> {
    coordinator: &'a ApprovalCoordinator,
    id: RequestId,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.coordinator.remove(&self.id);
    }
}

/// Coordinates approval requests between gated executions and the
/// configured channel.
///
/// The channel is injected at construction and never changes; pass
/// `None` to run without one.
pub struct ApprovalCoordinator {
    channel: Option<Arc<dyn ApprovalChannel>>,
    pending: Mutex<HashMap<RequestId, PendingApproval>>,
    poll_interval: Duration,
}

impl ApprovalCoordinator {
    /// Create a coordinator. `None` disables approval gating entirely:
    /// every request is approved on the spot.
    #[must_use]
    pub fn new(channel: Option<Arc<dyn ApprovalChannel>>) -> Self {
        Self {
            channel,
            pending: Mutex::new(HashMap::new()),
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Override the poll cadence. Mainly for tests.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Whether an approval channel is configured.
    #[must_use]
    pub fn has_channel(&self) -> bool {
        self.channel.is_some()
    }

    /// Number of requests currently awaiting a decision.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.lock_pending().len()
    }

    /// Snapshot of the requests currently awaiting a decision, in no
    /// particular order.
    #[must_use]
    pub fn pending_requests(&self) -> Vec<ApprovalRequest> {
        self.lock_pending()
            .values()
            .map(|entry| entry.request.clone())
            .collect()
    }

    /// Ask for permission to run `action`, blocking until a decision
    /// arrives or `timeout` expires.
    ///
    /// Never fails: every possible condition (no channel, human reply,
    /// timeout, channel error) maps to an approved or rejected
    /// [`ApprovalOutcome`] whose approver names the path taken. If the
    /// waiting task is cancelled, the pending entry is cleaned up and
    /// the in-flight approval is lost.
    pub async fn request_approval(
        &self,
        action: &str,
        details: &str,
        severity: Severity,
        timeout: Duration,
    ) -> ApprovalOutcome {
        let Some(channel) = self.channel.as_ref().map(Arc::clone) else {
            debug!(action, "no approval channel configured, allowing");
            return ApprovalOutcome::approve(
                Approver::NoChannel,
                "no approval channel configured",
                Duration::ZERO,
            );
        };

        let request = ApprovalRequest::new(action, details, severity);
        let id = request.id.clone();
        let started = Instant::now();

        self.insert_pending(request.clone());
        let _guard = PendingGuard {
            coordinator: self,
            id: id.clone(),
        };
        info!(id = %id, action, severity = %severity, "approval requested");

        if let Err(e) = channel.send_prompt(&request, timeout).await {
            warn!(id = %id, "failed to send approval prompt: {e}");
            return ApprovalOutcome::reject(
                Approver::ChannelError,
                format!("approval channel error: {e}"),
                started.elapsed(),
            );
        }

        loop {
            match self.state_of(&id) {
                Some(RequestState::Approved) => {
                    let elapsed = started.elapsed();
                    info!(id = %id, elapsed_secs = elapsed.as_secs(), "approved by operator");
                    return ApprovalOutcome::approve(
                        Approver::Human,
                        "approved by operator reply",
                        elapsed,
                    );
                }
                Some(RequestState::Rejected) => {
                    let elapsed = started.elapsed();
                    info!(id = %id, elapsed_secs = elapsed.as_secs(), "rejected by operator");
                    return ApprovalOutcome::reject(
                        Approver::Human,
                        "rejected by operator reply",
                        elapsed,
                    );
                }
                Some(RequestState::Pending) => {}
                None => {
                    warn!(id = %id, "pending request disappeared, rejecting");
                    return ApprovalOutcome::reject(
                        Approver::ChannelError,
                        "approval request dropped",
                        started.elapsed(),
                    );
                }
            }

            if started.elapsed() >= timeout {
                warn!(id = %id, timeout_secs = timeout.as_secs(), "approval timed out, rejecting");
                channel
                    .send_notice(&format!(
                        "No decision for request {id} within {}s; '{action}' was rejected.",
                        timeout.as_secs()
                    ))
                    .await;
                return ApprovalOutcome::reject(
                    Approver::Timeout,
                    format!("no decision within {}s", timeout.as_secs()),
                    started.elapsed(),
                );
            }

            match channel.poll_decision(&id).await {
                Ok(Some(decision)) => {
                    self.resolve(&id, decision);
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(id = %id, "approval channel error while polling: {e}");
                    return ApprovalOutcome::reject(
                        Approver::ChannelError,
                        format!("approval channel error: {e}"),
                        started.elapsed(),
                    );
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Record a decision for a pending request.
    ///
    /// Returns `true` if the request was pending and is now resolved.
    /// An unknown id or an already-decided request returns `false` and
    /// changes nothing, so duplicate or late replies are harmless.
    /// Push-capable channels may call this directly instead of waiting
    /// to be polled.
    pub fn resolve(&self, id: &RequestId, decision: ChannelDecision) -> bool {
        let mut pending = self.lock_pending();
        match pending.get_mut(id) {
            Some(entry) if entry.state == RequestState::Pending => {
                entry.state = match decision {
                    ChannelDecision::Approved => RequestState::Approved,
                    ChannelDecision::Rejected => RequestState::Rejected,
                };
                debug!(id = %id, ?decision, "request resolved");
                true
            }
            Some(_) => {
                debug!(id = %id, ?decision, "request already decided, ignoring");
                false
            }
            None => {
                debug!(id = %id, ?decision, "no pending request with this id, ignoring");
                false
            }
        }
    }

    fn insert_pending(&self, request: ApprovalRequest) {
        self.lock_pending().insert(
            request.id.clone(),
            PendingApproval {
                request,
                state: RequestState::Pending,
            },
        );
    }

    fn state_of(&self, id: &RequestId) -> Option<RequestState> {
        self.lock_pending().get(id).map(|entry| entry.state)
    }

    fn remove(&self, id: &RequestId) {
        self.lock_pending().remove(id);
    }

    fn lock_pending(&self) -> MutexGuard<'_, HashMap<RequestId, PendingApproval>> {
        self.pending.lock().unwrap_or_else(|e| {
            warn!("ApprovalCoordinator lock poisoned, recovering");
            e.into_inner()
        })
    }
}

impl fmt::Debug for ApprovalCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApprovalCoordinator")
            .field("has_channel", &self.has_channel())
            .field("pending", &self.pending_count())
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

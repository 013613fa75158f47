//! Approval request types.

use hearth_core::{Severity, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an approval request.
///
/// Ids travel inside free-text chat replies, so they are short, free of
/// whitespace, and unguessable enough that concurrent requests can never
/// collide: `<unix-seconds>-<12 hex chars>`, the hex being a hash prefix
/// over the request content and a random nonce.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Derive a fresh id for a request created at `created_at`.
    #[must_use]
    pub fn derive(action: &str, details: &str, created_at: Timestamp) -> Self {
        let nonce: u64 = rand::random();
        let mut hasher = blake3::Hasher::new();
        hasher.update(action.as_bytes());
        hasher.update(details.as_bytes());
        hasher.update(&created_at.unix_seconds().to_le_bytes());
        hasher.update(&nonce.to_le_bytes());
        let hex = hasher.finalize().to_hex();
        let (prefix, _) = hex.as_str().split_at(12);
        Self(format!("{}-{prefix}", created_at.unix_seconds()))
    }

    /// The id exactly as it appears in prompts and replies.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A request for human sign-off on one remediation action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRequest {
    /// Unique id, embedded in the prompt and echoed back in replies.
    pub id: RequestId,
    /// Machine-readable action name, e.g. `restart_lxc`.
    pub action: String,
    /// Human-readable description of what will run, shown verbatim.
    pub details: String,
    /// How serious the requested action is.
    pub severity: Severity,
    /// When the request was created.
    pub created_at: Timestamp,
}

impl ApprovalRequest {
    /// Create a request with a freshly derived id.
    #[must_use]
    pub fn new(
        action: impl Into<String>,
        details: impl Into<String>,
        severity: Severity,
    ) -> Self {
        let action = action.into();
        let details = details.into();
        let created_at = Timestamp::now();
        Self {
            id: RequestId::derive(&action, &details, created_at),
            action,
            details,
            severity,
            created_at,
        }
    }
}

/// Lifecycle state of a request held by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// Submitted, no decision yet.
    Pending,
    /// An operator approved it.
    Approved,
    /// An operator rejected it.
    Rejected,
}

//! The remediation action seam.
//!
//! Concrete integrations (Proxmox, Docker, systemd units, ...) implement
//! [`RemediationAction`]; the approval gate wraps them without knowing
//! anything about their internals.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Arguments passed to a remediation action.
///
/// A thin wrapper over a JSON object. Keys iterate in sorted order, so the
/// `Display` form is deterministic and safe to embed in approval prompts
/// and audit lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionArgs(serde_json::Map<String, Value>);

impl ActionArgs {
    /// Empty argument set.
    #[must_use]
    pub fn new() -> Self {
        Self(serde_json::Map::new())
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Raw value lookup.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String-typed lookup.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Unsigned-integer lookup.
    #[must_use]
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.0.get(key).and_then(Value::as_u64)
    }

    /// Whether the conventional `dry_run` flag is set and truthy.
    #[must_use]
    pub fn dry_run(&self) -> bool {
        self.0.get("dry_run").and_then(Value::as_bool).unwrap_or(false)
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the argument set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ActionArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in &self.0 {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            match value {
                Value::String(s) => write!(f, "{key}={s}")?,
                other => write!(f, "{key}={other}")?,
            }
        }
        Ok(())
    }
}

/// Errors raised by remediation actions themselves.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The target infrastructure API refused or failed the operation.
    #[error("{service}: {message}")]
    Api {
        /// Which upstream failed (e.g. `proxmox`, `docker`).
        service: String,
        /// Upstream error description.
        message: String,
    },

    /// Required arguments were missing or had the wrong shape.
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    /// Any other failure.
    #[error("{0}")]
    Other(String),
}

/// Result type for remediation actions.
pub type ActionResult<T> = Result<T, ActionError>;

/// A single remediation the agent can perform against the homelab.
///
/// Implementations do the real work (REST calls, SSH, container runtime
/// commands) and must honor the `dry_run` argument by reporting what they
/// would do without causing side effects.
#[async_trait::async_trait]
pub trait RemediationAction: Send + Sync {
    /// Stable machine-readable name, e.g. `restart_container`.
    fn name(&self) -> &str;

    /// Execute against `args`, returning a human-readable summary.
    async fn execute(&self, args: &ActionArgs) -> ActionResult<String>;
}

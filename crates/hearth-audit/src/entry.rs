//! Audit entry types.
//!
//! Every gating decision and every execution outcome is recorded as one
//! entry. The serialized form is part of the operational contract: other
//! tooling (log shippers, dashboards, grep) reads these lines, so the
//! field names and string values are locked.

use hearth_core::Timestamp;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{AuditError, AuditResult};

/// A single audit log entry: one line in the JSONL trail.
///
/// Entries are never mutated. When execution finishes after a decision was
/// already recorded, a second entry is appended with the terminal outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When this entry was written (UTC, ISO-8601).
    pub timestamp: Timestamp,
    /// Machine-readable action name, e.g. `restart_container`.
    pub action: String,
    /// Human-readable description of what the action targets.
    pub details: String,
    /// Whether the action was allowed to proceed.
    pub approved: bool,
    /// Who or what made the decision.
    pub approver: Approver,
    /// Execution outcome known at write time.
    pub outcome: AuditOutcome,
}

impl AuditEntry {
    /// Create an entry stamped with the current time.
    #[must_use]
    pub fn new(
        action: impl Into<String>,
        details: impl Into<String>,
        approved: bool,
        approver: Approver,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            timestamp: Timestamp::now(),
            action: action.into(),
            details: details.into(),
            approved,
            approver,
            outcome,
        }
    }

    /// Render as a single JSON line (no trailing newline).
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Serialize`] if serialization fails.
    pub fn to_json_line(&self) -> AuditResult<String> {
        serde_json::to_string(self).map_err(|e| AuditError::Serialize(e.to_string()))
    }

    /// Parse an entry back from a JSONL line.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Serialize`] if the line is not a valid entry.
    pub fn from_json_line(line: &str) -> AuditResult<Self> {
        serde_json::from_str(line).map_err(|e| AuditError::Serialize(e.to_string()))
    }
}

/// Who (or what rule) decided whether a gated action may run.
///
/// The string forms are locked; `auto (...)` marks decisions no human made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Approver {
    /// A human operator replied to the approval prompt.
    Human,
    /// No approval channel is configured; allowed by the fail-open rule.
    NoChannel,
    /// The resource is not classified critical; no approval was needed.
    NonCritical,
    /// The dry-run flag was set; executed without side effects.
    DryRun,
    /// Nobody replied before the deadline; rejected.
    Timeout,
    /// The approval channel failed; rejected.
    ChannelError,
}

impl Approver {
    /// The locked string form written to the audit trail.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::NoChannel => "auto (no telegram)",
            Self::NonCritical => "auto (non-critical)",
            Self::DryRun => "auto (dry-run)",
            Self::Timeout => "auto (timeout)",
            Self::ChannelError => "auto (error)",
        }
    }

    /// Whether a human made this decision.
    #[must_use]
    pub fn is_human(&self) -> bool {
        matches!(self, Self::Human)
    }
}

impl fmt::Display for Approver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Approver {
    type Err = ParseApproverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(Self::Human),
            "auto (no telegram)" => Ok(Self::NoChannel),
            "auto (non-critical)" => Ok(Self::NonCritical),
            "auto (dry-run)" => Ok(Self::DryRun),
            "auto (timeout)" => Ok(Self::Timeout),
            "auto (error)" => Ok(Self::ChannelError),
            other => Err(ParseApproverError(other.to_string())),
        }
    }
}

impl Serialize for Approver {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Approver {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Error returned when parsing an approver string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown approver: {0}")]
pub struct ParseApproverError(pub String);

/// Outcome of an audited action at the time the entry was written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AuditOutcome {
    /// Decision recorded; execution has not produced an outcome yet (and
    /// never will, for rejected actions).
    Pending,
    /// Action completed successfully.
    Success,
    /// Action completed in dry-run mode.
    DryRun,
    /// Action failed; carries the error message.
    Failure(String),
}

impl AuditOutcome {
    /// Create a failure outcome.
    #[must_use]
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure(reason.into())
    }

    /// Whether this outcome marks a completed, successful execution.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success | Self::DryRun)
    }
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::DryRun => write!(f, "success(dry-run)"),
            Self::Failure(reason) => write!(f, "failure:{reason}"),
        }
    }
}

impl FromStr for AuditOutcome {
    type Err = ParseOutcomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(reason) = s.strip_prefix("failure:") {
            return Ok(Self::Failure(reason.to_string()));
        }
        match s {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "success(dry-run)" => Ok(Self::DryRun),
            other => Err(ParseOutcomeError(other.to_string())),
        }
    }
}

impl Serialize for AuditOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AuditOutcome {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Error returned when parsing an outcome string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown outcome: {0}")]
pub struct ParseOutcomeError(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_approver_strings() {
        assert_eq!(Approver::Human.to_string(), "human");
        assert_eq!(Approver::NoChannel.to_string(), "auto (no telegram)");
        assert_eq!(Approver::NonCritical.to_string(), "auto (non-critical)");
        assert_eq!(Approver::DryRun.to_string(), "auto (dry-run)");
        assert_eq!(Approver::Timeout.to_string(), "auto (timeout)");
        assert_eq!(Approver::ChannelError.to_string(), "auto (error)");
    }

    #[test]
    fn test_approver_parse_round_trip() {
        for approver in [
            Approver::Human,
            Approver::NoChannel,
            Approver::NonCritical,
            Approver::DryRun,
            Approver::Timeout,
            Approver::ChannelError,
        ] {
            assert_eq!(approver.to_string().parse::<Approver>().unwrap(), approver);
        }
        assert!("auto".parse::<Approver>().is_err());
    }

    #[test]
    fn test_outcome_strings() {
        assert_eq!(AuditOutcome::Pending.to_string(), "pending");
        assert_eq!(AuditOutcome::Success.to_string(), "success");
        assert_eq!(AuditOutcome::DryRun.to_string(), "success(dry-run)");
        assert_eq!(
            AuditOutcome::failure("container not found").to_string(),
            "failure:container not found"
        );
    }

    #[test]
    fn test_outcome_parse_keeps_colons_in_reason() {
        let outcome = "failure:proxmox: connection refused".parse::<AuditOutcome>().unwrap();
        assert_eq!(outcome, AuditOutcome::failure("proxmox: connection refused"));
    }

    #[test]
    fn test_entry_json_round_trip() {
        let entry = AuditEntry::new(
            "restart_lxc",
            "restart_lxc node=pve vmid=200",
            true,
            Approver::Human,
            AuditOutcome::Success,
        );
        let line = entry.to_json_line().unwrap();
        let parsed = AuditEntry::from_json_line(&line).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn test_entry_json_round_trip_failure_outcome() {
        let entry = AuditEntry::new(
            "restart_docker",
            "restart_docker container=postgres",
            true,
            Approver::DryRun,
            AuditOutcome::failure("docker: no such container"),
        );
        let line = entry.to_json_line().unwrap();
        assert_eq!(AuditEntry::from_json_line(&line).unwrap(), entry);
    }

    #[test]
    fn test_entry_serialized_shape() {
        let entry = AuditEntry {
            timestamp: Timestamp::from_datetime(Utc.with_ymd_and_hms(2026, 8, 21, 12, 0, 0).unwrap()),
            action: "restart_lxc".to_string(),
            details: "restart_lxc vmid=200".to_string(),
            approved: false,
            approver: Approver::Timeout,
            outcome: AuditOutcome::Pending,
        };
        let value: serde_json::Value = serde_json::from_str(&entry.to_json_line().unwrap()).unwrap();
        assert_eq!(value["timestamp"], "2026-08-21T12:00:00Z");
        assert_eq!(value["action"], "restart_lxc");
        assert_eq!(value["approved"], false);
        assert_eq!(value["approver"], "auto (timeout)");
        assert_eq!(value["outcome"], "pending");
    }

    #[test]
    fn test_entry_rejects_unknown_approver() {
        let line = r#"{"timestamp":"2026-08-21T12:00:00Z","action":"a","details":"d","approved":true,"approver":"robot","outcome":"success"}"#;
        assert!(AuditEntry::from_json_line(line).is_err());
    }
}

//! Execution gating.
//!
//! The gate is the only path through which remediation actions run:
//! classify the target, seek approval when it is critical, execute, and
//! audit every decision and outcome.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use hearth_audit::{Approver, AuditEntry, AuditLog, AuditOutcome};
use hearth_core::{ActionArgs, ActionResult, RemediationAction, ResourceCategory, ResourceId};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::coordinator::{ApprovalCoordinator, DEFAULT_APPROVAL_TIMEOUT};
use crate::registry::CriticalResources;

/// Error returned when a policy cannot find a resource identifier in an
/// action's arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot extract resource identifier: {0}")]
pub struct ExtractError(pub String);

/// How a gated action's resource identifier is read from its arguments.
pub type IdentifierExtractor =
    Box<dyn Fn(&ActionArgs) -> Result<ResourceId, ExtractError> + Send + Sync>;

/// Which resource a remediation touches and how to find it.
pub struct GatePolicy {
    category: ResourceCategory,
    extract: IdentifierExtractor,
}

impl GatePolicy {
    /// Policy with a custom extractor.
    #[must_use]
    pub fn new(
        category: ResourceCategory,
        extract: impl Fn(&ActionArgs) -> Result<ResourceId, ExtractError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            extract: Box::new(extract),
        }
    }

    /// Policy reading a numeric id from `key`, Proxmox VMID style.
    #[must_use]
    pub fn numeric_arg(category: ResourceCategory, key: &'static str) -> Self {
        Self::new(category, move |args| {
            args.get_u64(key)
                .map(ResourceId::Id)
                .ok_or_else(|| ExtractError(format!("missing or non-numeric argument '{key}'")))
        })
    }

    /// Policy reading a name from `key`, container-name style.
    #[must_use]
    pub fn named_arg(category: ResourceCategory, key: &'static str) -> Self {
        Self::new(category, move |args| {
            args.get_str(key)
                .map(ResourceId::from)
                .ok_or_else(|| ExtractError(format!("missing or non-string argument '{key}'")))
        })
    }

    /// The resource category this policy guards.
    #[must_use]
    pub fn category(&self) -> ResourceCategory {
        self.category
    }
}

impl fmt::Debug for GatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatePolicy")
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// What the gate did with an action.
///
/// Rejection is a normal, expected result of the workflow, not an error.
/// Callers must branch on it rather than bubble it with `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateVerdict {
    /// The action ran to completion.
    Executed {
        /// The action's own summary output.
        output: String,
        /// How the run was authorized.
        approver: Approver,
    },
    /// The gate refused to run the action.
    Rejected {
        /// Why, including who or what rejected.
        reason: String,
    },
}

impl GateVerdict {
    /// Whether the action ran.
    #[must_use]
    pub fn is_executed(&self) -> bool {
        matches!(self, Self::Executed { .. })
    }

    /// Whether the gate refused to run the action.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// The action output, if it ran.
    #[must_use]
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Executed { output, .. } => Some(output),
            Self::Rejected { .. } => None,
        }
    }
}

/// Wraps remediation actions with classification, approval, and audit.
///
/// Construction wires in the registry, the coordinator, and the audit
/// log; gating behavior is then fixed for the life of the gate.
pub struct ActionGate {
    registry: Arc<CriticalResources>,
    coordinator: Arc<ApprovalCoordinator>,
    audit: AuditLog,
    approval_timeout: Duration,
}

impl ActionGate {
    /// Create a gate with the default five-minute approval timeout.
    #[must_use]
    pub fn new(
        registry: Arc<CriticalResources>,
        coordinator: Arc<ApprovalCoordinator>,
        audit: AuditLog,
    ) -> Self {
        Self {
            registry,
            coordinator,
            audit,
            approval_timeout: DEFAULT_APPROVAL_TIMEOUT,
        }
    }

    /// Override the approval timeout.
    #[must_use]
    pub fn with_approval_timeout(mut self, timeout: Duration) -> Self {
        self.approval_timeout = timeout;
        self
    }

    /// Run `action` under `policy`.
    ///
    /// Non-critical targets execute straight away. Critical targets
    /// execute only after approval, except that a truthy `dry_run`
    /// argument skips the approval step since no side effects follow.
    /// Every executed action and every approval decision lands in the
    /// audit log.
    ///
    /// # Errors
    ///
    /// Propagates the action's own [`ActionError`] when execution fails.
    /// A rejection is not an error; it is [`GateVerdict::Rejected`].
    ///
    /// [`ActionError`]: hearth_core::ActionError
    pub async fn run(
        &self,
        action: &dyn RemediationAction,
        policy: &GatePolicy,
        args: &ActionArgs,
    ) -> ActionResult<GateVerdict> {
        let name = action.name();
        let details = if args.is_empty() {
            name.to_string()
        } else {
            format!("{name} {args}")
        };

        let resource = match (policy.extract)(args) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(action = name, "identifier extraction failed, treating as non-critical: {e}");
                None
            }
        };
        let critical =
            resource.filter(|id| self.registry.is_critical(policy.category(), id));

        let Some(resource) = critical else {
            debug!(action = name, "not a critical resource, executing");
            let output = action.execute(args).await?;
            self.audit.record(&AuditEntry::new(
                name,
                &details,
                true,
                Approver::NonCritical,
                AuditOutcome::Success,
            ));
            return Ok(GateVerdict::Executed {
                output,
                approver: Approver::NonCritical,
            });
        };

        if args.dry_run() {
            debug!(action = name, "dry-run on critical resource, skipping approval");
            let output = action.execute(args).await?;
            self.audit.record(&AuditEntry::new(
                name,
                &details,
                true,
                Approver::DryRun,
                AuditOutcome::DryRun,
            ));
            return Ok(GateVerdict::Executed {
                output,
                approver: Approver::DryRun,
            });
        }

        let severity = self.registry.severity_for(policy.category(), &resource);
        let outcome = self
            .coordinator
            .request_approval(name, &details, severity, self.approval_timeout)
            .await;

        self.audit.record(&AuditEntry::new(
            name,
            &details,
            outcome.approved,
            outcome.approver,
            AuditOutcome::Pending,
        ));

        if !outcome.is_approved() {
            info!(action = name, approver = %outcome.approver, "gated action rejected");
            return Ok(GateVerdict::Rejected {
                reason: outcome.reason,
            });
        }

        match action.execute(args).await {
            Ok(output) => {
                self.audit.record(&AuditEntry::new(
                    name,
                    &details,
                    true,
                    outcome.approver,
                    AuditOutcome::Success,
                ));
                Ok(GateVerdict::Executed {
                    output,
                    approver: outcome.approver,
                })
            }
            Err(e) => {
                self.audit.record(&AuditEntry::new(
                    name,
                    &details,
                    true,
                    outcome.approver,
                    AuditOutcome::failure(e.to_string()),
                ));
                Err(e)
            }
        }
    }
}

impl fmt::Debug for ActionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionGate")
            .field("approval_timeout", &self.approval_timeout)
            .finish_non_exhaustive()
    }
}

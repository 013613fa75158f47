//! Hearth Approval - Human-in-the-loop gating for remediation actions.
//!
//! Remediation is allowed to touch most of the lab freely, but a small
//! set of critical resources (the NAS, the reverse proxy, the database
//! everyone's services depend on) requires a human to say yes first.
//! This crate provides that gate.
//!
//! # Design
//!
//! - [`CriticalResources`] classifies targets; unknown means not critical
//! - [`ApprovalCoordinator`] owns pending requests and the decision wait
//!   loop over a pluggable [`ApprovalChannel`]
//! - [`ActionGate`] wires classification, approval, execution, and audit
//!   into the single entry point [`ActionGate::run`]
//! - No channel configured: approve immediately. Channel present but
//!   silent or broken: reject. The asymmetry is deliberate.
//!
//! # Example
//!
//! ```rust
//! use hearth_approval::prelude::*;
//! use hearth_audit::AuditLog;
//! use hearth_core::ResourceCategory;
//! use std::sync::Arc;
//!
//! let mut registry = CriticalResources::new();
//! registry.insert(ResourceCategory::Lxc, 200_u64);
//!
//! let coordinator = Arc::new(ApprovalCoordinator::new(None));
//! let gate = ActionGate::new(Arc::new(registry), coordinator, AuditLog::in_memory());
//! let policy = GatePolicy::numeric_arg(ResourceCategory::Lxc, "vmid");
//! # let _ = (gate, policy);
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod channel;
mod coordinator;
mod error;
mod gate;
mod registry;
mod request;

pub use channel::{ApprovalChannel, ChannelDecision, ChannelError};
pub use coordinator::{ApprovalCoordinator, ApprovalOutcome, DEFAULT_APPROVAL_TIMEOUT};
pub use error::{ApprovalError, ApprovalResult};
pub use gate::{ActionGate, ExtractError, GatePolicy, GateVerdict, IdentifierExtractor};
pub use registry::CriticalResources;
pub use request::{ApprovalRequest, RequestId, RequestState};

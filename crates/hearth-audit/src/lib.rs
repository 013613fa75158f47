//! Hearth Audit - Append-only JSONL audit logging.
//!
//! Every gating decision and every execution outcome becomes one JSON line
//! in an append-only trail. Entries are never rewritten: when an action
//! finishes after its decision was recorded, a second line carries the
//! terminal outcome.
//!
//! # Design
//!
//! - One [`AuditEntry`] per line, locked field names and string values
//! - [`AuditSink`] implementations: file-backed [`JsonlSink`] and
//!   test-friendly [`MemorySink`]
//! - The [`AuditLog`] facade swallows sink failures with a warning, so a
//!   full disk never blocks remediation
//!
//! # Example
//!
//! ```rust
//! use hearth_audit::{Approver, AuditEntry, AuditLog, AuditOutcome};
//!
//! let log = AuditLog::in_memory();
//! log.record(&AuditEntry::new(
//!     "restart_lxc",
//!     "restart_lxc node=pve vmid=200",
//!     true,
//!     Approver::Human,
//!     AuditOutcome::Success,
//! ));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod entry;
mod error;
mod log;
mod sink;

pub use entry::{
    Approver, AuditEntry, AuditOutcome, ParseApproverError, ParseOutcomeError,
};
pub use error::{AuditError, AuditResult};
pub use log::AuditLog;
pub use sink::{AuditSink, JsonlSink, MemorySink};

//! Prelude module - commonly used types for convenient import.
//!
//! Use `use hearth_audit::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use hearth_audit::prelude::*;
//!
//! let log = AuditLog::in_memory();
//! log.record(&AuditEntry::new(
//!     "restart_docker",
//!     "restart_docker container=unifi",
//!     true,
//!     Approver::NonCritical,
//!     AuditOutcome::Success,
//! ));
//! ```

// Errors
pub use crate::{AuditError, AuditResult};

// Entry types
pub use crate::{Approver, AuditEntry, AuditOutcome};

// Log and sinks
pub use crate::{AuditLog, AuditSink, JsonlSink, MemorySink};

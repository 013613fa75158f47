//! The audit log facade.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::entry::AuditEntry;
use crate::error::AuditResult;
use crate::sink::{AuditSink, JsonlSink, MemorySink};

/// Append-only trail of gating decisions and execution outcomes.
///
/// Writes are synchronous and infallible from the caller's perspective: a
/// failing sink is reported through `tracing` and otherwise ignored, so
/// audit unavailability never blocks remediation.
#[derive(Clone)]
pub struct AuditLog {
    sink: Arc<dyn AuditSink>,
}

impl AuditLog {
    /// Create a log over any sink.
    #[must_use]
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Log to a JSONL file at `path`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened for appending.
    pub fn to_file(path: impl AsRef<Path>) -> AuditResult<Self> {
        Ok(Self::new(Arc::new(JsonlSink::open(path)?)))
    }

    /// Log to process memory. Used by tests and ephemeral runs.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySink::new()))
    }

    /// Append `entry`, reporting sink failures as warnings.
    pub fn record(&self, entry: &AuditEntry) {
        if let Err(e) = self.sink.append(entry) {
            tracing::warn!("Failed to append audit entry for '{}': {e}", entry.action);
        }
    }
}

impl fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditLog").finish_non_exhaustive()
    }
}

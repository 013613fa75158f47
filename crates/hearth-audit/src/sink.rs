//! Sinks the audit log writes to.

use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::entry::AuditEntry;
use crate::error::{AuditError, AuditResult};

/// Destination for audit entries.
///
/// Implementations must be thread-safe; `append` is called synchronously
/// from the remediation path, so it should return quickly.
pub trait AuditSink: Send + Sync {
    /// Append one entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be serialized or written.
    fn append(&self, entry: &AuditEntry) -> AuditResult<()>;
}

/// Append-only JSONL file sink: one JSON object per line, flushed on every
/// write.
#[derive(Debug)]
pub struct JsonlSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlSink {
    /// Open the file at `path` for appending, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Io`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> AuditResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| AuditError::Io {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Path this sink appends to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for JsonlSink {
    fn append(&self, entry: &AuditEntry) -> AuditResult<()> {
        let line = entry.to_json_line()?;
        let mut file = self.file.lock().unwrap_or_else(|e| {
            tracing::warn!("JsonlSink lock poisoned, recovering");
            e.into_inner()
        });
        writeln!(file, "{line}")
            .and_then(|()| file.flush())
            .map_err(|source| AuditError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

/// In-memory sink for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemorySink {
    /// Create an empty in-memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far, in append order.
    #[must_use]
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| {
                tracing::warn!("MemorySink lock poisoned, recovering");
                e.into_inner()
            })
            .clone()
    }

    /// Number of entries appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|e| {
                tracing::warn!("MemorySink lock poisoned, recovering");
                e.into_inner()
            })
            .len()
    }

    /// Whether nothing has been appended yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for MemorySink {
    fn append(&self, entry: &AuditEntry) -> AuditResult<()> {
        self.entries
            .lock()
            .unwrap_or_else(|e| {
                tracing::warn!("MemorySink lock poisoned, recovering");
                e.into_inner()
            })
            .push(entry.clone());
        Ok(())
    }
}

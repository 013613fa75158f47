//! Audit-related error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur with audit logging.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The sink file could not be opened or written.
    #[error("audit i/o error at {path}: {source}")]
    Io {
        /// Path of the sink file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An entry could not be serialized or parsed.
    #[error("audit serialization error: {0}")]
    Serialize(String),
}

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;

//! Error types for approval gating.

use thiserror::Error;

/// Errors raised while building approval components from configuration.
///
/// Runtime approval itself never fails with these: a broken channel or an
/// expired wait is expressed as a rejection, not an error.
#[derive(Debug, Error)]
pub enum ApprovalError {
    /// A gating config entry names a resource category the classifier does
    /// not know. A typo here would silently leave a resource unguarded, so
    /// it must fail at startup.
    #[error("unknown resource category '{category}' in gating config")]
    UnknownCategory {
        /// The unrecognized category name as written in the config.
        category: String,
    },
}

/// Result type for approval operations.
pub type ApprovalResult<T> = Result<T, ApprovalError>;

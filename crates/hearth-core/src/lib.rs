//! Hearth Core - Foundation types and traits for the Hearth homelab agent.
//!
//! This crate provides:
//! - Infrastructure vocabulary: resource categories, identifiers, severities
//! - The [`RemediationAction`] trait implemented by every remediation
//! - Argument and error types shared across the remediation pipeline

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod action;
pub mod types;

pub use action::{ActionArgs, ActionError, ActionResult, RemediationAction};
pub use types::{ParseCategoryError, ResourceCategory, ResourceId, Severity, Timestamp};

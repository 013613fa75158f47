//! Convenience re-exports for approval gating.
//!
//! ```rust
//! use hearth_approval::prelude::*;
//! # use std::sync::Arc;
//!
//! let coordinator = Arc::new(ApprovalCoordinator::new(None));
//! let registry = Arc::new(CriticalResources::new());
//! ```

pub use crate::channel::{ApprovalChannel, ChannelDecision, ChannelError};
pub use crate::coordinator::{
    ApprovalCoordinator, ApprovalOutcome, DEFAULT_APPROVAL_TIMEOUT,
};
pub use crate::error::{ApprovalError, ApprovalResult};
pub use crate::gate::{ActionGate, ExtractError, GatePolicy, GateVerdict};
pub use crate::registry::CriticalResources;
pub use crate::request::{ApprovalRequest, RequestId, RequestState};

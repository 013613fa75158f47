//! The approval channel seam.
//!
//! A channel is whatever out-of-band transport carries prompts to a human
//! and decisions back. The coordinator only ever talks to this trait, so
//! tests script it and production plugs in Telegram.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::request::{ApprovalRequest, RequestId};

/// A decision surfaced by the channel for a specific request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelDecision {
    /// The operator approved the request.
    Approved,
    /// The operator rejected the request.
    Rejected,
}

/// Errors surfaced by channel implementations.
///
/// The coordinator never propagates these. Any channel error during an
/// active request turns into an unconditional rejection of the gated
/// action.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The transport cannot be reached at all.
    #[error("channel unavailable: {0}")]
    Unavailable(String),
    /// A call to the transport failed mid-flight.
    #[error("channel transport error: {0}")]
    Transport(String),
}

/// Out-of-band channel through which a human approves or rejects actions.
#[async_trait]
pub trait ApprovalChannel: Send + Sync {
    /// Deliver the approval prompt for `request`.
    ///
    /// The prompt must show the exact reply syntax including the request
    /// id, and the auto-reject deadline derived from `timeout`.
    ///
    /// # Errors
    ///
    /// Returns a [`ChannelError`] when the prompt cannot be delivered.
    async fn send_prompt(
        &self,
        request: &ApprovalRequest,
        timeout: Duration,
    ) -> Result<(), ChannelError>;

    /// Check, without blocking on a human, whether a decision for `id`
    /// has arrived.
    ///
    /// # Errors
    ///
    /// Returns a [`ChannelError`] when the transport fails.
    async fn poll_decision(&self, id: &RequestId) -> Result<Option<ChannelDecision>, ChannelError>;

    /// Best-effort one-way notification. Implementations log and swallow
    /// transport failures.
    async fn send_notice(&self, text: &str);
}

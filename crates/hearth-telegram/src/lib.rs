//! Hearth Telegram - Telegram-backed approval channel.
//!
//! Implements [`hearth_approval::ApprovalChannel`] over a single Telegram
//! chat: approval prompts go out as bot messages, and the operator replies
//! `/approve <id>` or `/reject <id>` in the same chat.
//!
//! # Example
//!
//! ```rust,no_run
//! use hearth_approval::ApprovalCoordinator;
//! use hearth_telegram::TelegramChannel;
//! use std::sync::Arc;
//!
//! let channel = TelegramChannel::new("123456:bot-token", -1001234);
//! let coordinator = ApprovalCoordinator::new(Some(Arc::new(channel)));
//! # let _ = coordinator;
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod channel;
mod format;

pub use channel::TelegramChannel;
pub use format::html_escape;

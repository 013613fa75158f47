//! The Telegram approval channel.
//!
//! Prompts go out as HTML messages to one configured chat; decisions come
//! back as `/approve <id>` / `/reject <id>` replies fetched via
//! `getUpdates`. Parsed replies are retained in a short-lived map so that
//! concurrently pending requests never steal each other's updates.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use hearth_approval::{
    ApprovalChannel, ApprovalRequest, ChannelDecision, ChannelError, RequestId,
};
use hearth_config::TelegramSection;
use teloxide::prelude::*;
use teloxide::types::{ParseMode, UpdateKind};
use tracing::{debug, warn};

use crate::format;

/// Parsed replies older than this are reaped; their request has long
/// since timed out.
const REPLY_TTL: Duration = Duration::from_secs(5 * 60);

/// A decision parsed from chat, waiting to be claimed by its request.
struct SeenReply {
    decision: ChannelDecision,
    seen_at: Instant,
}

/// Cursor and reply buffer shared by all polling requests.
#[derive(Default)]
struct PollState {
    /// `getUpdates` offset: one past the newest update already consumed.
    offset: Option<i32>,
    /// Keyed by the request id string from the reply.
    replies: HashMap<String, SeenReply>,
}

impl PollState {
    fn reap_stale(&mut self) {
        self.replies
            .retain(|_, seen| seen.seen_at.elapsed() < REPLY_TTL);
    }
}

/// Approval channel backed by one Telegram chat.
pub struct TelegramChannel {
    bot: Bot,
    chat_id: ChatId,
    poll: Mutex<PollState>,
}

impl TelegramChannel {
    /// Create a channel for `chat_id` using `token`.
    #[must_use]
    pub fn new(token: impl Into<String>, chat_id: i64) -> Self {
        Self {
            bot: Bot::new(token.into()),
            chat_id: ChatId(chat_id),
            poll: Mutex::new(PollState::default()),
        }
    }

    /// Build a channel from the `[telegram]` config section, or `None`
    /// when the section is incomplete.
    #[must_use]
    pub fn from_config(section: &TelegramSection) -> Option<Self> {
        let token = section.bot_token.as_deref()?;
        let chat_id = section.chat_id?;
        Some(Self::new(token, chat_id))
    }

    fn lock_poll(&self) -> MutexGuard<'_, PollState> {
        self.poll.lock().unwrap_or_else(|e| {
            warn!("TelegramChannel lock poisoned, recovering");
            e.into_inner()
        })
    }
}

#[async_trait]
impl ApprovalChannel for TelegramChannel {
    async fn send_prompt(
        &self,
        request: &ApprovalRequest,
        timeout: Duration,
    ) -> Result<(), ChannelError> {
        let text = format::approval_prompt(request, timeout);
        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .await
            .map_err(|e| ChannelError::Unavailable(e.to_string()))?;
        debug!(id = %request.id, "approval prompt sent");
        Ok(())
    }

    async fn poll_decision(&self, id: &RequestId) -> Result<Option<ChannelDecision>, ChannelError> {
        let offset = self.lock_poll().offset;

        let fetch = self.bot.get_updates().timeout(0);
        let fetch = match offset {
            Some(offset) => fetch.offset(offset),
            None => fetch,
        };
        let updates = fetch
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))?;

        let mut poll = self.lock_poll();
        poll.reap_stale();
        for update in updates {
            let next_offset = i32::try_from(update.id.0.saturating_add(1)).unwrap_or(i32::MAX);
            poll.offset = Some(poll.offset.map_or(next_offset, |o| o.max(next_offset)));

            let UpdateKind::Message(message) = update.kind else {
                continue;
            };
            if message.chat.id != self.chat_id {
                continue;
            }
            let Some(text) = message.text() else {
                continue;
            };
            let Some((reply_id, decision)) = parse_reply(text) else {
                continue;
            };
            debug!(id = %reply_id, ?decision, "operator reply received");
            poll.replies.insert(
                reply_id,
                SeenReply {
                    decision,
                    seen_at: Instant::now(),
                },
            );
        }
        Ok(poll.replies.remove(id.as_str()).map(|seen| seen.decision))
    }

    async fn send_notice(&self, text: &str) {
        if let Err(e) = self.bot.send_message(self.chat_id, text.to_string()).await {
            warn!("Failed to send notice: {e}");
        }
    }
}

impl fmt::Debug for TelegramChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramChannel")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

/// Parse an operator reply.
///
/// Accepts exactly `/approve <id>` or `/reject <id>`, with an optional
/// `@botname` suffix on the command as sent by Telegram clients in
/// groups. Anything else, including extra trailing words, is not a
/// decision.
fn parse_reply(text: &str) -> Option<(String, ChannelDecision)> {
    let mut tokens = text.split_whitespace();
    let command = tokens.next()?;
    let id = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }

    let command = command.split('@').next().unwrap_or(command);
    let decision = match command {
        "/approve" => ChannelDecision::Approved,
        "/reject" => ChannelDecision::Rejected,
        _ => return None,
    };
    Some((id.to_string(), decision))
}

//! Per-event handling: classify, then reply, reset, or converse.
//!
//! `CommandRouter::handle` is the boundary where every per-request failure
//! is turned into a user-facing reply. Nothing that goes wrong while
//! handling one event escapes to the accept loop.

use std::sync::Arc;
use std::time::Duration;

use chatrelay_types::chat::{ChatId, Turn, UserId};
use chatrelay_types::transport::InboundEvent;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::chunker;
use crate::conversation::{ConversationStore, RequestBuilder};
use crate::dispatch::Dispatcher;
use crate::transport::Transport;

use super::command::{Command, classify};

/// How often the typing indicator is refreshed while waiting for a completion.
const TYPING_REFRESH: Duration = Duration::from_secs(4);

/// Fixed texts the relay sends.
#[derive(Debug, Clone)]
pub struct Replies {
    pub greeting: String,
    pub help: String,
    pub reset_done: String,
    pub apology: String,
}

impl Default for Replies {
    fn default() -> Self {
        Self {
            greeting: "Hi! I'm an AI assistant bot.\n\
                       Send me a message and I'll answer with our conversation in mind.\n\n\
                       Available commands:\n\
                       • /help - how to use the bot\n\
                       • /reset - clear the conversation history"
                .to_string(),
            help: "Just send a text and I'll reply, taking our previous messages into account.\n\
                   The /reset command clears your conversation history."
                .to_string(),
            reset_done: "Conversation history cleared ✅".to_string(),
            apology: "Oops, something went wrong. Please try again later.".to_string(),
        }
    }
}

/// Result of handling one inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Blank input: no reply, no state change.
    Ignored,
    /// Replies were sent; `messages` counts those the transport accepted.
    Replied { messages: usize },
    /// The completion failed and the apology was sent instead.
    Apologized,
}

/// Drives the store, builder, dispatcher, and transport for each inbound event.
///
/// Generic over `ConversationStore` and `Transport` so handlers can be wired
/// to in-memory or persistent history and to any chat transport.
pub struct CommandRouter<S: ConversationStore, T: Transport> {
    store: Arc<S>,
    builder: RequestBuilder,
    dispatcher: Dispatcher,
    transport: Arc<T>,
    chunk_limit: usize,
    replies: Replies,
}

impl<S: ConversationStore, T: Transport> CommandRouter<S, T> {
    pub fn new(
        store: Arc<S>,
        builder: RequestBuilder,
        dispatcher: Dispatcher,
        transport: Arc<T>,
        chunk_limit: usize,
    ) -> Self {
        Self {
            store,
            builder,
            dispatcher,
            transport,
            chunk_limit,
            replies: Replies::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn replies(&self) -> &Replies {
        &self.replies
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Handle one inbound event to completion.
    pub async fn handle(&self, event: InboundEvent) -> Outcome {
        let span = info_span!(
            "inbound",
            request_id = %Uuid::now_v7(),
            user_id = %event.user_id,
            chat_id = %event.chat_id,
        );
        self.route(event).instrument(span).await
    }

    async fn route(&self, event: InboundEvent) -> Outcome {
        let Some(command) = classify(&event.text) else {
            debug!("ignoring blank message");
            return Outcome::Ignored;
        };
        debug!(command = command.label(), "classified message");

        match command {
            Command::Start => self.reply(event.chat_id, &self.replies.greeting).await,
            Command::Help => self.reply(event.chat_id, &self.replies.help).await,
            Command::Reset => {
                self.store.clear(event.user_id);
                info!("history reset");
                self.reply(event.chat_id, &self.replies.reset_done).await
            }
            Command::Freeform(text) => self.converse(event.user_id, event.chat_id, &text).await,
        }
    }

    async fn converse(&self, user: UserId, chat: ChatId, text: &str) -> Outcome {
        let payload = match self.builder.build(self.store.as_ref(), user, text) {
            Ok(payload) => payload,
            Err(err) => {
                debug!(%err, "dropping message");
                return Outcome::Ignored;
            }
        };
        let user_turn = payload.user_turn().clone();
        debug!(turns = payload.turns().len(), "dispatching completion");

        let invoke = self.dispatcher.invoke(payload);
        tokio::pin!(invoke);
        let mut typing = tokio::time::interval(TYPING_REFRESH);
        let result = loop {
            tokio::select! {
                result = &mut invoke => break result,
                _ = typing.tick() => {
                    if let Err(err) = self.transport.indicate_typing(chat).await {
                        debug!(%err, "typing indicator failed");
                    }
                }
            }
        };

        let reply = match result {
            Ok(reply) => reply,
            Err(err) => {
                error!(error = %err, "completion dispatch failed");
                self.reply(chat, &self.replies.apology).await;
                return Outcome::Apologized;
            }
        };

        self.store
            .append_exchange(user, user_turn, Turn::assistant(reply.as_str()));

        let chunks = chunker::split(&reply, self.chunk_limit);
        let mut sent = 0;
        for chunk in &chunks {
            if let Err(err) = self.transport.send(chat, chunk).await {
                warn!(%err, sent, total = chunks.len(), "failed to deliver reply chunk");
                break;
            }
            sent += 1;
        }
        info!(chunks = sent, reply_chars = reply.chars().count(), "replied");
        Outcome::Replied { messages: sent }
    }

    async fn reply(&self, chat: ChatId, text: &str) -> Outcome {
        match self.transport.send(chat, text).await {
            Ok(()) => Outcome::Replied { messages: 1 },
            Err(err) => {
                warn!(%err, "failed to deliver reply");
                Outcome::Replied { messages: 0 }
            }
        }
    }
}

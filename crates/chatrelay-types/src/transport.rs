//! Messages exchanged with the chat transport.

use serde::{Deserialize, Serialize};

use crate::chat::{ChatId, UserId};

/// Hard size limit of one outbound message, in characters.
pub const TRANSPORT_MESSAGE_LIMIT: usize = 4096;

/// One inbound text event delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub text: String,
}

impl InboundEvent {
    pub fn new(user_id: UserId, chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            user_id,
            chat_id,
            text: text.into(),
        }
    }
}

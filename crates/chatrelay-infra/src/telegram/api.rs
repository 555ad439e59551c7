//! Telegram Bot API wire types (the subset the relay uses).

use serde::Deserialize;

use chatrelay_types::chat::{ChatId, UserId};
use chatrelay_types::error::TransportError;
use chatrelay_types::transport::InboundEvent;

/// Envelope every Bot API method responds with.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the result, turning `ok: false` into [`TransportError::Api`].
    pub fn into_result(self) -> Result<T, TransportError> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            (true, None) => Err(TransportError::Decode("response has no result".to_string())),
            (false, _) => Err(TransportError::Api(format!(
                "{} ({})",
                self.description.as_deref().unwrap_or("unknown error"),
                self.error_code.map_or_else(|| "no code".to_string(), |c| c.to_string())
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
}

impl Update {
    /// Convert to an inbound event. Only text messages from human senders count.
    pub fn into_event(self) -> Option<InboundEvent> {
        let message = self.message?;
        let from = message.from.filter(|u| !u.is_bot)?;
        let text = message.text?;
        Some(InboundEvent::new(
            UserId(from.id),
            ChatId(message.chat.id),
            text,
        ))
    }
}

use std::sync::Arc;

use chatrelay_core::transport::Transport;
use chatrelay_types::chat::ChatId;
use chatrelay_types::error::TransportError;

use super::client::TelegramClient;

/// Reply side of the Telegram adapter.
#[derive(Clone)]
pub struct TelegramTransport {
    client: Arc<TelegramClient>,
}

impl TelegramTransport {
    pub fn new(client: Arc<TelegramClient>) -> Self {
        Self { client }
    }
}

impl Transport for TelegramTransport {
    async fn send(&self, chat: ChatId, text: &str) -> Result<(), TransportError> {
        self.client.send_message(chat, text).await
    }

    async fn indicate_typing(&self, chat: ChatId) -> Result<(), TransportError> {
        self.client.send_chat_action(chat, "typing").await
    }
}

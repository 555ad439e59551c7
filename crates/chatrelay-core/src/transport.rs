//! Outbound side of the chat transport.
//!
//! Inbound events reach the relay through an `mpsc` channel (see
//! [`crate::accept`]); replies leave through this trait.

use chatrelay_types::chat::ChatId;
use chatrelay_types::error::TransportError;

/// Sends replies back to a chat.
///
/// Implementations live in chatrelay-infra (Telegram) and the app crate (console).
pub trait Transport: Send + Sync {
    /// Deliver one text message to `chat`. `text` is already within the size limit.
    fn send(
        &self,
        chat: ChatId,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;

    /// Show a "typing" indicator while a reply is being generated.
    fn indicate_typing(
        &self,
        _chat: ChatId,
    ) -> impl std::future::Future<Output = Result<(), TransportError>> + Send {
        async { Ok(()) }
    }
}

//! Request assembly from the system prompt, stored history, and the new message.

use std::sync::Arc;

use chatrelay_types::chat::{RequestPayload, Turn, UserId};
use chatrelay_types::error::ValidationError;

use super::store::ConversationStore;

/// Builds `[system, ..history, user]` payloads.
///
/// Reads a snapshot of the history; never mutates the store.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    system_prompt: Arc<str>,
}

impl RequestBuilder {
    pub fn new(system_prompt: impl Into<Arc<str>>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
        }
    }

    /// Assemble the payload for `text` from `user`.
    ///
    /// The new user turn carries the trimmed text. Returns
    /// [`ValidationError::EmptyMessage`] when nothing is left after trimming;
    /// callers must then skip dispatch entirely.
    pub fn build<S>(
        &self,
        store: &S,
        user: UserId,
        text: &str,
    ) -> Result<RequestPayload, ValidationError>
    where
        S: ConversationStore + ?Sized,
    {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }

        Ok(RequestPayload::new(
            Turn::system(&*self.system_prompt),
            store.get(user),
            Turn::user(text),
        ))
    }
}

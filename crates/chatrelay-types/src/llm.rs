//! Completion service request and error types.
//!
//! The relay only ever needs a single, non-streaming completion: an ordered
//! list of role-tagged turns in, one text out.

use serde::Serialize;

use crate::chat::{RequestPayload, Turn};

/// Request sent to a completion provider.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Turn>,
    pub temperature: f32,
}

impl CompletionRequest {
    /// Wrap an assembled payload with the run-wide model settings.
    pub fn from_payload(payload: RequestPayload, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            messages: payload.into_turns(),
            temperature,
        }
    }
}

/// Errors from completion provider operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited or quota exhausted")]
    RateLimited,

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("response contained no choices")]
    EmptyChoices,
}

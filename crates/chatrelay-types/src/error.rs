use std::path::PathBuf;

use thiserror::Error;

use crate::llm::LlmError;

/// Inbound text that cannot be turned into a request.
///
/// Never reported to the user: the event is dropped without a reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("message is empty after trimming")]
    EmptyMessage,
}

/// Failure of one dispatch to the completion service.
///
/// Carries the operator diagnostic. Users only ever see a fixed apology.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("completion failed: {0}")]
    Completion(#[from] LlmError),

    #[error("dispatch worker failed: {0}")]
    WorkerFailed(String),

    #[error("dispatch pool is closed")]
    PoolClosed,
}

/// Missing or invalid startup configuration. Fatal before the relay starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("missing credential: environment variable '{0}' is not set")]
    MissingCredential(String),
}

/// Errors talking to the chat transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport request failed: {0}")]
    Http(String),

    #[error("transport API error: {0}")]
    Api(String),

    #[error("failed to decode transport response: {0}")]
    Decode(String),

    #[error("transport I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("transport is closed")]
    Closed,
}

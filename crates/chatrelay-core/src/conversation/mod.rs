//! Per-user conversation history and request assembly.
//!
//! - `store` -- `ConversationStore` trait and the bounded in-memory implementation
//! - `builder` -- `RequestBuilder` assembling `[system, ..history, user]` payloads

pub mod builder;
pub mod store;

pub use builder::RequestBuilder;
pub use store::{ConversationStore, InMemoryConversationStore};

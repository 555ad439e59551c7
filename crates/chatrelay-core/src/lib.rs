//! Conversation orchestration for chatrelay.
//!
//! This crate defines the ports (`ConversationStore`, `CompletionProvider`,
//! `Transport`) and the logic that drives them: request assembly, dispatch
//! on a bounded worker pool, reply chunking, and command routing. It
//! depends only on `chatrelay-types` -- never on `chatrelay-infra`.

pub mod accept;
pub mod chunker;
pub mod conversation;
pub mod dispatch;
pub mod llm;
pub mod router;
pub mod transport;

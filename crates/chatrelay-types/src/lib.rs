//! Shared domain types for chatrelay.
//!
//! This crate contains the data shapes passed between the relay layers:
//! participants, conversational turns, request payloads, transport events,
//! the startup configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod transport;

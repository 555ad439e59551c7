//! Infrastructure layer for chatrelay.
//!
//! Contains implementations of the ports defined in `chatrelay-core`:
//! the OpenAI-compatible completion provider, the Telegram Bot API
//! transport and long-poll event source, plus configuration loading and
//! credential resolution.

pub mod config;
pub mod llm;
pub mod secret;
pub mod telegram;

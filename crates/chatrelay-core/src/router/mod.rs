//! Inbound message routing.
//!
//! - `command` -- pure classifier producing a closed `Command` variant
//! - `handler` -- `CommandRouter` acting on the classified command

pub mod command;
pub mod handler;

pub use command::{Command, classify};
pub use handler::{CommandRouter, Outcome, Replies};

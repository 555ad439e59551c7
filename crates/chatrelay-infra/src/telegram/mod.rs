//! Telegram Bot API adapter: long-poll event source and reply transport.

pub mod api;
pub mod client;
pub mod poller;
pub mod transport;

pub use client::TelegramClient;
pub use poller::run_poller;
pub use transport::TelegramTransport;

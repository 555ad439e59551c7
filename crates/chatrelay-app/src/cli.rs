//! CLI definitions for the `chatrelay` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Relay Telegram chats to an OpenAI-compatible completion service.
#[derive(Parser)]
#[command(name = "chatrelay", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config.toml (overrides CHATRELAY_CONFIG and the default location).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress all log output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// More log output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the Telegram relay (long polling until Ctrl+C).
    Run,

    /// Chat with the relay over stdin/stdout instead of Telegram.
    Console,

    /// Validate configuration and credentials, then print the effective settings.
    Check,
}

impl Cli {
    /// Log filter used when RUST_LOG is not set.
    pub fn default_filter(&self) -> &'static str {
        let quiet_default = match self.command {
            // Logs would interleave with the conversation on stdout.
            Commands::Console => "warn",
            Commands::Run | Commands::Check => "info",
        };

        match self.verbose {
            0 if self.quiet => "error",
            0 => quiet_default,
            1 => "info,chatrelay=debug,chatrelay_core=debug,chatrelay_infra=debug",
            _ => "trace",
        }
    }
}

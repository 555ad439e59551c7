//! chatrelay entry point.
//!
//! Binary name: `chatrelay`
//!
//! Loads configuration, initializes logging, then runs the Telegram relay,
//! the console relay, or a configuration check.

mod cli;
mod console;
mod state;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use chatrelay_core::accept::run_accept_loop;
use chatrelay_infra::config::{ConfigSource, LoadedConfig, load_config, resolve_config_path};
use chatrelay_infra::secret::{Credentials, provider_key_from_env};
use chatrelay_infra::telegram::{TelegramClient, TelegramTransport, run_poller};
use chatrelay_observe::{LogFormat, init_tracing, shutdown_tracing};
use chatrelay_types::config::RelayConfig;
use chatrelay_types::error::ConfigError;

use cli::{Cli, Commands};
use console::ConsoleTransport;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = resolve_config_path(cli.config.as_deref());
    let loaded = load_config(&config_path).await;

    let result = match &cli.command {
        // `check` reports configuration problems itself.
        Commands::Check => return check(&config_path, loaded),
        Commands::Run => {
            let config = init_logging(&cli, &config_path, loaded?)?;
            run_telegram(config).await
        }
        Commands::Console => {
            let config = init_logging(&cli, &config_path, loaded?)?;
            run_console(config).await
        }
    };

    shutdown_tracing();
    result
}

/// Install the subscriber, then report where the configuration came from.
fn init_logging(cli: &Cli, path: &Path, loaded: LoadedConfig) -> anyhow::Result<RelayConfig> {
    let LoadedConfig { config, source } = loaded;
    init_tracing(
        LogFormat::from_json_flag(config.logging.json),
        config.logging.otel,
        cli.default_filter(),
    )
    .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    match source {
        ConfigSource::File => tracing::info!(path = %path.display(), "{}", config_origin(source)),
        ConfigSource::Defaults => tracing::debug!(path = %path.display(), "{}", config_origin(source)),
    }
    Ok(config)
}

fn config_origin(source: ConfigSource) -> &'static str {
    match source {
        ConfigSource::File => "loaded config file",
        ConfigSource::Defaults => "no config file, using defaults",
    }
}

/// Long-poll Telegram and relay every chat until Ctrl+C / SIGTERM.
async fn run_telegram(config: RelayConfig) -> anyhow::Result<()> {
    let credentials = Credentials::from_env(&config)?;

    let client = Arc::new(TelegramClient::new(
        config.telegram.api_base.clone(),
        credentials.telegram_token,
        Duration::from_secs(config.telegram.poll_timeout_secs),
    )?);
    let transport = Arc::new(TelegramTransport::new(Arc::clone(&client)));
    let router = Arc::new(state::build_router(
        &config,
        credentials.provider_api_key,
        transport,
    ));

    let (tx, rx) = mpsc::channel(config.telegram.inbound_buffer);
    let shutdown = CancellationToken::new();

    let poller = tokio::spawn(run_poller(
        client,
        tx,
        config.telegram.poll_timeout_secs,
        shutdown.clone(),
    ));
    tokio::spawn(cancel_on_signal(shutdown.clone()));

    tracing::info!(model = %config.model, "chatrelay is running, press Ctrl+C to stop");

    let stats = run_accept_loop(Arc::clone(&router), rx, shutdown.clone()).await;
    shutdown.cancel();
    let forwarded = poller.await.context("telegram poller task failed")?;

    tracing::info!(
        forwarded,
        accepted = stats.accepted,
        completed = stats.completed,
        panicked = stats.panicked,
        users = router.store().user_count(),
        "chatrelay stopped"
    );
    Ok(())
}

/// Relay stdin lines as a single local user until EOF or Ctrl+C.
async fn run_console(config: RelayConfig) -> anyhow::Result<()> {
    let api_key = provider_key_from_env(&config)?;
    let transport = Arc::new(ConsoleTransport::stdout());
    let router = Arc::new(state::build_router(&config, api_key, transport));

    let (tx, rx) = mpsc::channel(config.telegram.inbound_buffer);
    let shutdown = CancellationToken::new();

    println!(
        "  {} Talking to {} ({}). Type /help, /reset, or Ctrl+D to quit.",
        ::console::style("⚡").bold(),
        ::console::style(&config.model).cyan(),
        config.provider.name
    );

    let reader = tokio::spawn(console::forward_lines(
        tokio::io::BufReader::new(tokio::io::stdin()),
        tx,
        shutdown.clone(),
    ));
    tokio::spawn(cancel_on_signal(shutdown.clone()));

    let stats = run_accept_loop(router, rx, shutdown.clone()).await;
    shutdown.cancel();
    // A pending stdin read cannot be cancelled; the process exits once it returns.
    reader.abort();

    tracing::debug!(accepted = stats.accepted, "console session ended");
    Ok(())
}

/// Validate config and credentials and print the effective settings.
fn check(path: &Path, loaded: Result<LoadedConfig, ConfigError>) -> anyhow::Result<()> {
    let mark = |ok: bool| {
        if ok {
            format!("{}", ::console::style("✓").green())
        } else {
            format!("{}", ::console::style("✗").red())
        }
    };

    println!();
    println!(
        "  {} Config: {}",
        ::console::style("🔍").bold(),
        ::console::style(path.display()).cyan()
    );
    println!();

    let config = match loaded {
        Ok(LoadedConfig { config, source }) => {
            println!("  {} {}", mark(true), config_origin(source));
            config
        }
        Err(e) => {
            println!("  {} {e}", mark(false));
            println!();
            return Err(e.into());
        }
    };

    println!("  {} Configuration is valid", mark(true));
    println!();
    println!("  model             {}", config.model);
    println!("  temperature       {}", config.temperature);
    println!("  max turns         {} ({} stored turns)", config.max_turns, config.history_capacity());
    println!("  chunk limit       {}", config.chunk_limit);
    println!("  dispatch workers  {}", config.dispatch_workers);
    println!("  provider          {} at {}", config.provider.name, config.provider.base_url);
    println!("  telegram API      {}", config.telegram.api_base);
    println!("  poll timeout      {}s", config.telegram.poll_timeout_secs);
    println!(
        "  logging           {}{}",
        if config.logging.json { "json" } else { "pretty" },
        if config.logging.otel { " + otel" } else { "" }
    );
    println!();

    match Credentials::from_env(&config) {
        Ok(_) => {
            println!(
                "  {} Credentials found in {} and {}",
                mark(true),
                config.telegram.token_env,
                config.provider.api_key_env
            );
            println!();
            Ok(())
        }
        Err(e) => {
            println!("  {} {e}", mark(false));
            println!();
            Err(e.into())
        }
    }
}

/// Cancel `shutdown` on Ctrl+C or SIGTERM.
async fn cancel_on_signal(shutdown: CancellationToken) {
    shutdown_signal().await;
    tracing::info!("shutdown signal received, finishing in-flight requests");
    shutdown.cancel();
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

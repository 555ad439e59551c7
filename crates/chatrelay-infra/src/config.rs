//! Configuration loader for chatrelay.
//!
//! Reads `config.toml` and deserializes it into [`RelayConfig`]. A missing
//! file yields defaults; an unreadable, malformed, or out-of-range file is
//! a [`ConfigError`], which stops the relay before it accepts any event.

use std::path::{Path, PathBuf};

use chatrelay_types::config::RelayConfig;
use chatrelay_types::error::ConfigError;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "CHATRELAY_CONFIG";

/// Resolve the config file path.
///
/// Priority:
/// 1. Explicit path (the `--config` flag)
/// 2. `CHATRELAY_CONFIG` environment variable
/// 3. `~/.chatrelay/config.toml`
/// 4. `./.chatrelay/config.toml` when no home directory is known
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    dirs::home_dir()
        .map(|home| home.join(".chatrelay"))
        .unwrap_or_else(|| PathBuf::from(".chatrelay"))
        .join("config.toml")
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from the file at the resolved path.
    File,
    /// No file at the resolved path; built-in defaults.
    Defaults,
}

/// A validated configuration and its origin.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: RelayConfig,
    pub source: ConfigSource,
}

/// Load and validate the configuration at `path`.
///
/// Runs before logging is set up, so the origin is returned for the
/// caller to report.
pub async fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let config = RelayConfig::default();
            config.validate()?;
            return Ok(LoadedConfig {
                config,
                source: ConfigSource::Defaults,
            });
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let config = parse_config(&content, path)?;
    config.validate()?;
    Ok(LoadedConfig {
        config,
        source: ConfigSource::File,
    })
}

fn parse_config(content: &str, path: &Path) -> Result<RelayConfig, ConfigError> {
    toml::from_str::<RelayConfig>(content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

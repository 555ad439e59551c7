//! Credential resolution from environment variables.
//!
//! Secrets are wrapped in [`SecretString`] as soon as they are read so they
//! never end up in `Debug` output or logs. A missing or blank variable is a
//! [`ConfigError::MissingCredential`].

use chatrelay_types::config::RelayConfig;
use chatrelay_types::error::ConfigError;
use secrecy::SecretString;

/// Credentials the relay needs at startup.
#[derive(Debug)]
pub struct Credentials {
    pub telegram_token: SecretString,
    pub provider_api_key: SecretString,
}

impl Credentials {
    /// Read both credentials from the variables named in `config`.
    pub fn from_env(config: &RelayConfig) -> Result<Self, ConfigError> {
        Self::resolve_with(config, |name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`, which maps a variable name to its value.
    pub fn resolve_with<F>(config: &RelayConfig, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            telegram_token: resolve_secret(&config.telegram.token_env, &lookup)?,
            provider_api_key: resolve_secret(&config.provider.api_key_env, &lookup)?,
        })
    }
}

/// Resolve only the provider key (console mode needs no transport token).
pub fn provider_key_from_env(config: &RelayConfig) -> Result<SecretString, ConfigError> {
    resolve_secret(&config.provider.api_key_env, &|name| std::env::var(name).ok())
}

fn resolve_secret<F>(var: &str, lookup: &F) -> Result<SecretString, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) if !value.trim().is_empty() => Ok(SecretString::from(value.trim().to_string())),
        _ => Err(ConfigError::MissingCredential(var.to_string())),
    }
}

//! Startup configuration for the relay.
//!
//! `RelayConfig` mirrors the `config.toml` file. Every field has a default,
//! so an empty file (or no file at all) yields a working configuration as
//! long as the credentials are present in the environment.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::transport::TRANSPORT_MESSAGE_LIMIT;

/// Top-level relay configuration. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// System prompt prepended to every request.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Model identifier sent to the completion service.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature sent to the completion service.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Logical turns (user + assistant pairs) retained per user.
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    /// Maximum characters per outbound message.
    #[serde(default = "default_chunk_limit")]
    pub chunk_limit: usize,

    /// Completion calls allowed in flight at once.
    #[serde(default = "default_dispatch_workers")]
    pub dispatch_workers: usize,

    #[serde(default)]
    pub provider: ProviderSettings,

    #[serde(default)]
    pub telegram: TelegramSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

fn default_system_prompt() -> String {
    "You are an attentive and concise assistant. Answer to the point.".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.4
}

fn default_max_turns() -> usize {
    8
}

fn default_chunk_limit() -> usize {
    TRANSPORT_MESSAGE_LIMIT
}

fn default_dispatch_workers() -> usize {
    8
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            model: default_model(),
            temperature: default_temperature(),
            max_turns: default_max_turns(),
            chunk_limit: default_chunk_limit(),
            dispatch_workers: default_dispatch_workers(),
            provider: ProviderSettings::default(),
            telegram: TelegramSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl RelayConfig {
    /// Check value ranges. Credentials are resolved separately.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.system_prompt.trim().is_empty() {
            return Err(invalid("system_prompt", "must not be empty"));
        }
        if self.model.trim().is_empty() {
            return Err(invalid("model", "must not be empty"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(invalid("temperature", "must be between 0 and 2"));
        }
        if self.max_turns == 0 {
            return Err(invalid("max_turns", "must be at least 1"));
        }
        if self.chunk_limit == 0 || self.chunk_limit > TRANSPORT_MESSAGE_LIMIT {
            return Err(ConfigError::Invalid {
                field: "chunk_limit",
                reason: format!("must be between 1 and {TRANSPORT_MESSAGE_LIMIT}"),
            });
        }
        if self.dispatch_workers == 0 {
            return Err(invalid("dispatch_workers", "must be at least 1"));
        }
        if self.provider.api_key_env.trim().is_empty() {
            return Err(invalid("provider.api_key_env", "must not be empty"));
        }
        if self.telegram.token_env.trim().is_empty() {
            return Err(invalid("telegram.token_env", "must not be empty"));
        }
        if self.telegram.inbound_buffer == 0 {
            return Err(invalid("telegram.inbound_buffer", "must be at least 1"));
        }
        Ok(())
    }

    /// History capacity in turns: one user and one assistant turn per logical turn.
    pub fn history_capacity(&self) -> usize {
        self.max_turns * 2
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

/// Completion service endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Human-readable provider name used in logs.
    #[serde(default = "default_provider_name")]
    pub name: String,

    /// Base URL of an OpenAI-compatible chat completions API.
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,

    /// Environment variable holding the API key.
    #[serde(default = "default_provider_key_env")]
    pub api_key_env: String,
}

fn default_provider_name() -> String {
    "openai".to_string()
}

fn default_provider_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_provider_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            base_url: default_provider_base_url(),
            api_key_env: default_provider_key_env(),
        }
    }
}

/// Telegram Bot API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramSettings {
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,

    /// Environment variable holding the bot token.
    #[serde(default = "default_telegram_token_env")]
    pub token_env: String,

    /// Long-poll timeout passed to `getUpdates`, in seconds.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,

    /// Capacity of the channel between the poller and the accept loop.
    #[serde(default = "default_inbound_buffer")]
    pub inbound_buffer: usize,
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_telegram_token_env() -> String {
    "TELEGRAM_BOT_TOKEN".to_string()
}

fn default_poll_timeout_secs() -> u64 {
    30
}

fn default_inbound_buffer() -> usize {
    256
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            api_base: default_telegram_api_base(),
            token_env: default_telegram_token_env(),
            poll_timeout_secs: default_poll_timeout_secs(),
            inbound_buffer: default_inbound_buffer(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[serde(default)]
    pub otel: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = RelayConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert!((config.temperature - 0.4).abs() < f32::EPSILON);
        assert_eq!(config.max_turns, 8);
        assert_eq!(config.history_capacity(), 16);
        assert_eq!(config.chunk_limit, 4096);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: RelayConfig = toml::from_str("").unwrap();
        assert_eq!(config.max_turns, 8);
        assert_eq!(config.telegram.poll_timeout_secs, 30);
        assert_eq!(config.provider.api_key_env, "OPENAI_API_KEY");
        assert!(!config.logging.json);
    }

    #[test]
    fn toml_overrides_nested_sections() {
        let config: RelayConfig = toml::from_str(
            r#"
model = "gpt-4o"
max_turns = 4

[provider]
base_url = "http://localhost:8080/v1"

[logging]
json = true
"#,
        )
        .unwrap();

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.history_capacity(), 8);
        assert_eq!(config.provider.base_url, "http://localhost:8080/v1");
        assert_eq!(config.provider.name, "openai");
        assert!(config.logging.json);
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let config = RelayConfig {
            temperature: 2.5,
            ..RelayConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "temperature", .. })
        ));

        let config = RelayConfig {
            chunk_limit: 5000,
            ..RelayConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "chunk_limit", .. })
        ));

        let config = RelayConfig {
            max_turns: 0,
            ..RelayConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "max_turns", .. })
        ));

        let config = RelayConfig {
            system_prompt: "   ".to_string(),
            ..RelayConfig::default()
        };
        assert!(config.validate().is_err());
    }
}

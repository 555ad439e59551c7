//! Minimal Telegram Bot API client over reqwest.
//!
//! The bot token is part of every method URL, so request errors are
//! stripped of their URL before they are logged or returned.

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::json;

use chatrelay_types::chat::ChatId;
use chatrelay_types::error::TransportError;

use super::api::{ApiResponse, Update};

/// Extra time the HTTP client waits beyond the long-poll timeout.
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Bot API client bound to one bot token.
pub struct TelegramClient {
    http: Client,
    api_base: String,
    token: SecretString,
}

impl TelegramClient {
    /// Create a client whose HTTP timeout outlasts `poll_timeout`.
    pub fn new(
        api_base: impl Into<String>,
        token: SecretString,
        poll_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(poll_timeout + POLL_GRACE)
            .build()
            .map_err(|e| TransportError::Http(e.without_url().to_string()))?;

        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Long-poll for updates after `offset`, waiting up to `timeout_secs`.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TransportError> {
        self.call(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": timeout_secs,
                "allowed_updates": ["message"],
            }),
        )
        .await
    }

    pub async fn send_message(&self, chat: ChatId, text: &str) -> Result<(), TransportError> {
        self.call::<serde_json::Value>(
            "sendMessage",
            &json!({ "chat_id": chat.0, "text": text }),
        )
        .await
        .map(|_| ())
    }

    pub async fn send_chat_action(&self, chat: ChatId, action: &str) -> Result<(), TransportError> {
        self.call::<bool>(
            "sendChatAction",
            &json!({ "chat_id": chat.0, "action": action }),
        )
        .await
        .map(|_| ())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<T, TransportError> {
        let url = format!(
            "{}/bot{}/{}",
            self.api_base,
            self.token.expose_secret(),
            method
        );

        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Http(e.without_url().to_string()))?;

        // The Bot API reports failures in the JSON body, also for non-2xx statuses.
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.without_url().to_string()))?;

        envelope.into_result()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(server: &MockServer) -> TelegramClient {
        TelegramClient::new(
            server.uri(),
            SecretString::from("123:abc".to_string()),
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn get_updates_posts_offset_and_parses_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/getUpdates"))
            .and(body_partial_json(json!({ "offset": 7, "timeout": 0 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": [{
                    "update_id": 7,
                    "message": {
                        "message_id": 1,
                        "chat": { "id": 3 },
                        "from": { "id": 4, "is_bot": false },
                        "text": "hey"
                    }
                }]
            })))
            .mount(&server)
            .await;

        let updates = client(&server).get_updates(7, 0).await.unwrap();

        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].update_id, 7);
    }

    #[tokio::test]
    async fn send_message_surfaces_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: message is too long"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .send_message(ChatId(3), "hello")
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Api(ref m) if m.contains("too long")));
    }

    #[tokio::test]
    async fn connection_errors_do_not_leak_the_token() {
        let client = TelegramClient::new(
            "http://127.0.0.1:9",
            SecretString::from("999:secret-token".to_string()),
            Duration::from_secs(1),
        )
        .unwrap();

        let err = client.send_message(ChatId(1), "x").await.unwrap_err();

        assert!(matches!(err, TransportError::Http(_)));
        assert!(!err.to_string().contains("secret-token"));
    }
}

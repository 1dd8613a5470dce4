use std::time::Duration;

use anyhow::{Result, bail};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::models::Update;

const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Typed client for the handful of Bot API methods the relay needs:
/// long polling for updates and sending messages and chat actions.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl Client {
    pub fn new(api_url: &str, token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// Every Bot API response is wrapped in `{ok, result, description?}`.
    /// Unwraps the result or surfaces the error description.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: Value,
        timeout: Duration,
    ) -> Result<T> {
        let response = self
            .http
            .post(self.method_url(method))
            .timeout(timeout)
            .json(&payload)
            .send()
            .await?;

        let mut body: Value = response.json().await?;
        if body["ok"].as_bool() != Some(true) {
            bail!(
                "Telegram {} failed: {}",
                method,
                body["description"].as_str().unwrap_or("unknown error")
            );
        }

        Ok(serde_json::from_value(body["result"].take())?)
    }

    /// Long poll for new updates. `offset` acknowledges every update with a
    /// lower id, so the server stops redelivering them.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>> {
        let payload = json!({"offset": offset, "timeout": timeout_secs});
        // Client timeout needs headroom over the server-side poll window
        let timeout = Duration::from_secs(timeout_secs + 10);
        self.call("getUpdates", payload, timeout).await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let payload = json!({"chat_id": chat_id, "text": text});
        self.call::<Value>("sendMessage", payload, SEND_TIMEOUT)
            .await?;
        Ok(())
    }

    /// Like `send_message` but rendered as Markdown on the client.
    pub async fn send_markdown(&self, chat_id: i64, text: &str) -> Result<()> {
        let payload = json!({"chat_id": chat_id, "text": text, "parse_mode": "Markdown"});
        self.call::<Value>("sendMessage", payload, SEND_TIMEOUT)
            .await?;
        Ok(())
    }

    /// Show a status indicator ("typing", etc.) in the chat.
    pub async fn send_chat_action(&self, chat_id: i64, action: &str) -> Result<()> {
        let payload = json!({"chat_id": chat_id, "action": action});
        self.call::<Value>("sendChatAction", payload, SEND_TIMEOUT)
            .await?;
        Ok(())
    }
}

use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::ModelPolicy;

/// Token ceiling on every generated reply.
const MAX_TOKENS: u32 = 1024;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60 * 2);

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

/// One turn in a conversation, in the shape the chat completion API
/// expects on the wire.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: &str) -> Self {
        Self {
            role,
            content: content.to_string(),
        }
    }
}

/// One round trip to an OpenAI-compatible chat completion endpoint.
/// Returns the reply text from the first choice.
///
/// Temperature and the extended-reasoning flag come from the model's
/// `ModelPolicy`. Reasoning is requested through `extra_body`, which NIM
/// forwards to the model's chat template.
pub async fn completion(
    messages: &[ChatMessage],
    policy: &ModelPolicy,
    api_hostname: &str,
    api_key: &str,
) -> Result<String> {
    let mut payload = json!({
        "model": policy.id,
        "messages": messages,
        "max_tokens": MAX_TOKENS,
        "temperature": policy.temperature,
    });
    if policy.thinking {
        payload["extra_body"] = json!({"chat_template_kwargs": {"thinking": true}});
    }

    let url = format!("{}/v1/chat/completions", api_hostname.trim_end_matches('/'));
    let response = reqwest::Client::new()
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .timeout(REQUEST_TIMEOUT)
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("Completion request failed with {}: {}", status, body);
    }

    let body: Value = response.json().await?;
    let reply = body["choices"][0]["message"]["content"]
        .as_str()
        .with_context(|| format!("No message content in completion response: {}", body))?;

    Ok(reply.to_string())
}

//! Anthropic Messages API client.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{CompletionError, CompletionProvider};
use crate::config::LlmSettings;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// HTTP connect timeout for completion calls.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Completion provider backed by the Anthropic Messages API.
#[derive(Clone)]
pub struct AnthropicClient {
    http_client: reqwest::Client,
    api_key: Option<SecretString>,
    messages_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    pub fn new(settings: &LlmSettings) -> Result<Self, CompletionError> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        if settings.api_key.is_none() {
            warn!("ANTHROPIC_API_KEY is not set; scenario generation will be unavailable");
        }

        Ok(Self {
            http_client,
            api_key: settings.api_key.clone(),
            messages_url: format!("{}/v1/messages", settings.base_url.trim_end_matches('/')),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
        })
    }
}

#[async_trait]
impl CompletionProvider for AnthropicClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        let api_key = self.api_key.as_ref().ok_or(CompletionError::MissingApiKey)?;

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system,
            messages: [Message {
                role: "user",
                content: user,
            }],
        };

        debug!(model = %self.model, url = %self.messages_url, "Sending completion request");

        let response = self
            .http_client
            .post(&self.messages_url)
            .header("x-api-key", api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Completion API returned an error");
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        parsed
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .ok_or(CompletionError::NoTextContent)
    }
}

//! Pure Anthropic messages-API client.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{LlmClientError, Result};
use crate::types::{ChatOptions, ChatResponse, Message, Role};

#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.anthropic.com/v1".to_string(),
            model: model.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub async fn chat(
        &self,
        system: &str,
        user: &str,
        history: &[Message],
        opts: &ChatOptions,
    ) -> Result<ChatResponse> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        for turn in history {
            messages.push(WireMessage {
                role: match turn.role {
                    Role::User => "user".to_string(),
                    Role::Assistant => "assistant".to_string(),
                },
                content: turn.content.clone(),
            });
        }
        messages.push(WireMessage {
            role: "user".to_string(),
            content: user.to_string(),
        });

        let body = MessagesRequest {
            model: self.model.clone(),
            system: system.to_string(),
            messages,
            temperature: opts.temperature,
            top_p: opts.top_p,
            max_tokens: opts.max_tokens.unwrap_or(1024),
        };

        let response = self
            .http_client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Anthropic request failed");
                LlmClientError::HttpFailure(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Anthropic API error");
            return Err(LlmClientError::ProviderError {
                code: status.as_u16().to_string(),
                message: error_text,
            });
        }

        let parsed: MessagesResponseRaw = response
            .json()
            .await
            .map_err(|e| LlmClientError::Parse(e.to_string()))?;

        let content = parsed
            .content
            .into_iter()
            .find_map(|block| if block.block_type == "text" { Some(block.text) } else { None })
            .ok_or(LlmClientError::EmptyResponse)?;

        if content.trim().is_empty() {
            return Err(LlmClientError::EmptyResponse);
        }

        debug!(model = %self.model, "anthropic chat completion succeeded");

        Ok(ChatResponse {
            content,
            tokens_used: parsed
                .usage
                .map(|u| u.input_tokens + u.output_tokens),
        })
    }
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    system: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct MessagesResponseRaw {
    content: Vec<ContentBlockRaw>,
    #[serde(default)]
    usage: Option<UsageRaw>,
}

#[derive(Debug, Deserialize)]
struct ContentBlockRaw {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct UsageRaw {
    input_tokens: u32,
    output_tokens: u32,
}

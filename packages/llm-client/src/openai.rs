//! Pure OpenAI chat-completions client.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{LlmClientError, Result};
use crate::types::{ChatOptions, ChatResponse, Message, Role};

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
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
        let mut messages = Vec::with_capacity(history.len() + 2);
        if !system.is_empty() {
            messages.push(WireMessage {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
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

        let body = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: opts.temperature,
            top_p: opts.top_p,
            max_tokens: opts.max_tokens,
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenAI request failed");
                LlmClientError::HttpFailure(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "OpenAI API error");
            return Err(LlmClientError::ProviderError {
                code: status.as_u16().to_string(),
                message: error_text,
            });
        }

        let parsed: ChatCompletionRaw = response
            .json()
            .await
            .map_err(|e| LlmClientError::Parse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(LlmClientError::EmptyResponse)?;

        if content.trim().is_empty() {
            return Err(LlmClientError::EmptyResponse);
        }

        debug!(model = %self.model, "openai chat completion succeeded");

        Ok(ChatResponse {
            content,
            tokens_used: parsed.usage.map(|u| u.total_tokens),
        })
    }
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionRaw {
    choices: Vec<ChoiceRaw>,
    #[serde(default)]
    usage: Option<UsageRaw>,
}

#[derive(Debug, Deserialize)]
struct ChoiceRaw {
    message: ChoiceMessageRaw,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessageRaw {
    content: String,
}

#[derive(Debug, Deserialize)]
struct UsageRaw {
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_base_url() {
        let client = OpenAiClient::new("sk-test", "gpt-4o").with_base_url("https://custom.api.com");
        assert_eq!(client.base_url, "https://custom.api.com");
        assert_eq!(client.model, "gpt-4o");
    }
}

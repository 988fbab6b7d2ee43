//! Uniform `Call(system, user, opts, history) -> text` over one of N
//! backends, selected process-wide at configuration time.
//!
//! Per design, this is a tagged variant of provider descriptors rather than
//! a `dyn Trait` object: the set of backends is closed and known at compile
//! time, and each call site already knows which concrete wire format it is
//! bridging to `llm_client`'s per-provider structs.

use std::time::Duration;

use llm_client::{AnthropicClient, ChatOptions, ChatResponse, LlmClientError, Message, MockClient, OpenAiClient};
use tracing::warn;

use crate::config::Config;
use crate::error::{AppError, Result};

const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_UNIT: Duration = Duration::from_millis(200);

pub enum LlmProvider {
    OpenAi(OpenAiClient),
    Anthropic(AnthropicClient),
    Mock(MockClient),
}

impl LlmProvider {
    pub fn name(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi(_) => "openai",
            LlmProvider::Anthropic(_) => "anthropic",
            LlmProvider::Mock(_) => "mock",
        }
    }

    /// Build the active provider from process configuration. `LLM_PROVIDER`
    /// selects which backend is live; only one is ever constructed.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        match config.llm_provider.as_str() {
            "openai" => {
                let api_key = config
                    .openai_api_key
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY must be set when LLM_PROVIDER=openai"))?;
                Ok(LlmProvider::OpenAi(OpenAiClient::new(api_key, config.openai_model.clone())))
            }
            "anthropic" => {
                let api_key = config
                    .anthropic_api_key
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("ANTHROPIC_API_KEY must be set when LLM_PROVIDER=anthropic"))?;
                Ok(LlmProvider::Anthropic(AnthropicClient::new(
                    api_key,
                    config.anthropic_model.clone(),
                )))
            }
            other => anyhow::bail!("unknown LLM_PROVIDER '{other}'"),
        }
    }

    async fn call_once(
        &self,
        system: &str,
        user: &str,
        history: &[Message],
        opts: &ChatOptions,
    ) -> std::result::Result<ChatResponse, LlmClientError> {
        match self {
            LlmProvider::OpenAi(client) => client.chat(system, user, history, opts).await,
            LlmProvider::Anthropic(client) => client.chat(system, user, history, opts).await,
            LlmProvider::Mock(client) => client.chat(system, user, history, opts).await,
        }
    }

    /// `Call` with up to 3 attempts and linear backoff; the request body is
    /// rebuilt fresh on every attempt, never replayed from a partial stream.
    pub async fn call(
        &self,
        system: &str,
        user: &str,
        history: &[Message],
        opts: &ChatOptions,
    ) -> Result<ChatResponse> {
        let mut last_err = None;

        for attempt in 1..=MAX_ATTEMPTS {
            match self.call_once(system, user, history, opts).await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    warn!(provider = self.name(), attempt, error = %err, "llm call failed");
                    last_err = Some(err);
                    if attempt < MAX_ATTEMPTS {
                        tokio::time::sleep(BACKOFF_UNIT * attempt).await;
                    }
                }
            }
        }

        Err(AppError::from(last_err.expect("loop runs at least once")))
    }
}

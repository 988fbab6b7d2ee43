//! Request/response shapes shared across backends.

use serde::{Deserialize, Serialize};

/// A single turn in a conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Sampling options recognized by §4.3: temperature, top_p, max_tokens.
/// `num_ctx`, `min_p`, and `seed` are additionally honored where the backend
/// supports them (used by the Ask Orchestrator).
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_tokens: Option<u32>,
    pub num_ctx: Option<u32>,
    pub min_p: Option<f32>,
    pub seed: Option<u64>,
}

impl ChatOptions {
    pub fn new(temperature: f32, top_p: f32, max_tokens: u32) -> Self {
        Self {
            temperature: Some(temperature),
            top_p: Some(top_p),
            max_tokens: Some(max_tokens),
            ..Default::default()
        }
    }
}

/// A completed chat response.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
    /// Rough token estimate for the completion, when the backend reports it.
    pub tokens_used: Option<u32>,
}

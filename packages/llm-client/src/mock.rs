//! Deterministic in-memory backend used by orchestrator/ask tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::{LlmClientError, Result};
use crate::types::{ChatOptions, ChatResponse, Message};

/// Replays a fixed script of responses, one per call, in order.
#[derive(Debug)]
pub struct MockClient {
    script: Mutex<Vec<MockReply>>,
    next: AtomicUsize,
}

#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Fail(String),
}

impl MockClient {
    pub fn new(script: Vec<MockReply>) -> Self {
        Self {
            script: Mutex::new(script),
            next: AtomicUsize::new(0),
        }
    }

    pub fn texts(replies: Vec<&str>) -> Self {
        Self::new(replies.into_iter().map(|s| MockReply::Text(s.to_string())).collect())
    }

    pub fn call_count(&self) -> usize {
        self.next.load(Ordering::SeqCst)
    }

    pub async fn chat(
        &self,
        _system: &str,
        _user: &str,
        _history: &[Message],
        _opts: &ChatOptions,
    ) -> Result<ChatResponse> {
        let idx = self.next.fetch_add(1, Ordering::SeqCst);
        let script = self.script.lock().expect("mock script mutex poisoned");
        match script.get(idx) {
            Some(MockReply::Text(text)) => Ok(ChatResponse {
                content: text.clone(),
                tokens_used: Some((text.len() / 4) as u32),
            }),
            Some(MockReply::Fail(msg)) => Err(LlmClientError::ProviderError {
                code: "mock".to_string(),
                message: msg.clone(),
            }),
            None => Err(LlmClientError::EmptyResponse),
        }
    }
}

//! Pure REST clients for chat-completion LLM backends.
//!
//! No retry policy and no provider-selection logic live here — that belongs
//! to the `LlmProvider` tagged union in `marketing-core`, which is the
//! capability callers actually depend on. This crate only knows how to
//! serialize a request and parse a response for each backend's wire format.

pub mod anthropic;
pub mod error;
pub mod mock;
pub mod openai;
pub mod types;

pub use anthropic::AnthropicClient;
pub use error::{LlmClientError, Result};
pub use mock::{MockClient, MockReply};
pub use openai::OpenAiClient;
pub use types::{ChatOptions, ChatResponse, Message, Role};

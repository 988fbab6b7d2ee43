//! Error types shared by every backend client.

use thiserror::Error;

/// Result type for LLM client operations.
pub type Result<T> = std::result::Result<T, LlmClientError>;

/// Errors a chat-completion backend can raise.
///
/// These map directly onto the failure modes named in the LLM Provider
/// component: `HTTPFailure`, `ProviderError(code, msg)`, `EmptyResponse`.
#[derive(Debug, Error)]
pub enum LlmClientError {
    /// Configuration error (missing API key, invalid settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport failure (connection refused, timeout, DNS).
    #[error("transport failure: {0}")]
    HttpFailure(String),

    /// The backend responded with a non-2xx status carrying a code/message.
    #[error("provider error ({code}): {message}")]
    ProviderError { code: String, message: String },

    /// The backend returned 2xx but no usable completion text.
    #[error("empty response from provider")]
    EmptyResponse,

    /// The response body could not be decoded into the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
}

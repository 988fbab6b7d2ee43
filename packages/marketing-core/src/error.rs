//! Error kinds surfaced across the core (spec §7).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("authentication required")]
    Unauthenticated,

    #[error("no game context for this group: {0}")]
    NotFound(String),

    #[error("duplicate file in this group")]
    DuplicateInGroup,

    #[error("generated content failed validation")]
    ValidationFailed { issues: Vec<String> },

    #[error("assertion failed")]
    AssertionFailed { issues: Vec<String> },

    #[error("llm transport error: {0}")]
    LlmTransport(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        // Postgres reports unique-constraint violations with a constraint
        // name we recognize; callers get a clean domain error instead of
        // the raw DB message.
        if let sqlx::Error::Database(db_err) = &err {
            if let Some(constraint) = db_err.constraint() {
                if constraint.contains("workshop_documents_user_group_sha256") {
                    return AppError::DuplicateInGroup;
                }
            }
        }
        AppError::Storage(err.to_string())
    }
}

impl From<llm_client::LlmClientError> for AppError {
    fn from(err: llm_client::LlmClientError) -> Self {
        AppError::LlmTransport(err.to_string())
    }
}

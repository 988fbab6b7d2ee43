use axum::extract::State;
use axum::Json;
use marketing_core::ask::{self, AskMode, AskRequest};
use marketing_core::error::AppError;
use marketing_core::retriever::Retriever;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::auth::AuthenticatedUser;
use crate::error_response::ApiError;

const DEFAULT_LIMIT: i64 = 6;

#[derive(Debug, Deserialize)]
pub struct AskHistoryTurn {
    #[allow(dead_code)]
    pub role: String,
    #[allow(dead_code)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct AskApiRequest {
    pub group_id: i64,
    pub question: String,
    pub limit: Option<i64>,
    #[allow(dead_code)]
    pub model: Option<String>,
    pub mode: Option<String>,
    pub allow_outside: Option<bool>,
    #[allow(dead_code)]
    pub output: Option<String>,
    #[allow(dead_code)]
    pub tone: Option<String>,
    #[allow(dead_code)]
    pub history: Option<Vec<AskHistoryTurn>>,
}

#[derive(Debug, Serialize)]
pub struct AskHitResponse {
    pub document_id: uuid::Uuid,
    pub page: i32,
    pub chunk_index: i32,
    pub snippet: String,
}

#[derive(Debug, Serialize)]
pub struct AskApiResponse {
    pub answer: String,
    pub hits: Vec<AskHitResponse>,
}

fn parse_mode(raw: Option<&str>) -> Result<AskMode, AppError> {
    match raw {
        None | Some("strict") => Ok(AskMode::Strict),
        Some("opinion") => Ok(AskMode::Opinion),
        Some(other) => Err(AppError::InvalidRequest(format!("unknown mode: {other}"))),
    }
}

pub async fn ask_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<AskApiRequest>,
) -> Result<Json<AskApiResponse>, ApiError> {
    if req.question.trim().is_empty() {
        return Err(ApiError(AppError::InvalidRequest("question must not be empty".to_string())));
    }

    let mode = parse_mode(req.mode.as_deref())?;
    let limit = req.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 8);
    let allow_outside = req.allow_outside.unwrap_or(false);

    let retriever = Retriever::new(state.store.as_ref());
    let ask_request = AskRequest {
        user_id: user.user_id,
        group_id: req.group_id,
        question: &req.question,
        limit,
        mode,
        allow_outside,
    };

    let response = ask::ask(&ask_request, &retriever, &state.memory, &state.llm).await?;

    Ok(Json(AskApiResponse {
        answer: response.answer,
        hits: response
            .hits
            .into_iter()
            .map(|h| AskHitResponse {
                document_id: h.document_id,
                page: h.page,
                chunk_index: h.chunk_index,
                snippet: h.snippet,
            })
            .collect(),
    }))
}

//! Thin axum Router wiring the core's Store, LLM provider, and
//! conversation memory to HTTP handlers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use marketing_core::domain::ConversationMemory;
use marketing_core::ingestion;
use marketing_core::llm::LlmProvider;
use marketing_core::store::{PgStore, Store};
use marketing_core::Config;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::routes;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub llm: Arc<LlmProvider>,
    pub memory: Arc<ConversationMemory>,
    pub uploads_root: PathBuf,
    pub db_pool: PgPool,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn Store> = Arc::new(PgStore::new(pool.clone()));
        let llm = Arc::new(LlmProvider::from_config(config)?);
        let memory = Arc::new(ConversationMemory::new());
        let uploads_root = PathBuf::from(&config.uploads_root);

        Ok(Self {
            store,
            llm,
            memory,
            uploads_root,
            db_pool: pool,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_handler))
        .route("/v1/strategy", post(routes::strategy::generate_handler))
        .route("/v1/ask", post(routes::ask::ask_handler))
        .route("/v1/upload", post(routes::upload::upload_handler))
        .layer(DefaultBodyLimit::max(ingestion::MAX_UPLOAD_BYTES as usize))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(60)))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

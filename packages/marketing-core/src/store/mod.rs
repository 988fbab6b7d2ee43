//! Typed read/write of game context, competitor insights, workshop
//! documents, chunks, and ingest jobs (spec §4.1).

mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Chunk, CompetitorInsights, GameContext, NewWorkshopDocument};
use crate::error::Result;

pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    async fn get_game_context(&self, user_id: i64, group_id: i64) -> Result<GameContext>;

    /// Always returns; `has_data = false` on an empty 14-day window.
    async fn get_competitor_insights(
        &self,
        user_id: i64,
        group_id: i64,
        platform: &str,
    ) -> Result<CompetitorInsights>;

    async fn create_workshop_document(&self, params: NewWorkshopDocument) -> Result<Uuid>;

    async fn enqueue_ingest_job(&self, document_id: Uuid) -> Result<()>;

    /// Full-text keyword rank.
    async fn search_chunks(&self, query: &str, user_id: i64, group_id: i64, limit: i64) -> Result<Vec<Chunk>>;

    /// Trigram fuzzy fallback.
    async fn fuzzy_chunks(&self, query: &str, user_id: i64, group_id: i64, limit: i64) -> Result<Vec<Chunk>>;
}

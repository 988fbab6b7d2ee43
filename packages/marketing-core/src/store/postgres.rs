use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::Store;
use crate::domain::{Chunk, CompetitorInsights, Confidence, GameContext, NewWorkshopDocument, StrategyCard};
use crate::error::{AppError, Result};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ChunkRow {
    document_id: Uuid,
    chunk_index: i32,
    page: i32,
    content: String,
}

impl From<ChunkRow> for Chunk {
    fn from(row: ChunkRow) -> Self {
        Chunk {
            document_id: row.document_id,
            chunk_index: row.chunk_index,
            page: row.page,
            content: row.content,
        }
    }
}

#[derive(sqlx::FromRow)]
struct GameContextRow {
    game_title: String,
    studio_name: Option<String>,
    game_summary: Option<String>,
    platforms: Vec<String>,
    engine_tech: Option<String>,
    primary_genre: Option<String>,
    subgenre: Option<String>,
    key_mechanics: Option<String>,
    playtime_length: Option<String>,
    art_style: Option<String>,
    tone: Option<String>,
    intended_audience: Option<String>,
    age_range: Option<String>,
    player_motivation: Option<String>,
    comparable_games: Option<String>,
    marketing_objective: Option<String>,
    key_events_dates: Option<String>,
    call_to_action: Option<String>,
    content_restrictions: Option<String>,
    competitors_to_avoid: Option<String>,
    additional_info: Option<String>,
}

impl From<GameContextRow> for GameContext {
    fn from(row: GameContextRow) -> Self {
        GameContext {
            game_title: row.game_title,
            studio_name: row.studio_name,
            game_summary: row.game_summary,
            platforms: row.platforms,
            engine_tech: row.engine_tech,
            primary_genre: row.primary_genre,
            subgenre: row.subgenre,
            key_mechanics: row.key_mechanics,
            playtime_length: row.playtime_length,
            art_style: row.art_style,
            tone: row.tone,
            intended_audience: row.intended_audience,
            age_range: row.age_range,
            player_motivation: row.player_motivation,
            comparable_games: row.comparable_games,
            marketing_objective: row.marketing_objective,
            key_events_dates: row.key_events_dates,
            call_to_action: row.call_to_action,
            content_restrictions: row.content_restrictions,
            competitors_to_avoid: row.competitors_to_avoid,
            additional_info: row.additional_info,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CompetitorRollupRow {
    sample_size: i64,
    posts_per_week: f64,
    best_day_iso: i32,
    best_day_name: String,
    avg_likes: f64,
    top_hook: Option<String>,
    top_hashtags: Vec<String>,
    competitor_handles: Vec<String>,
}

#[async_trait]
impl Store for PgStore {
    async fn get_game_context(&self, user_id: i64, group_id: i64) -> Result<GameContext> {
        let row = sqlx::query_as::<_, GameContextRow>(
            r#"
            SELECT game_title, studio_name, game_summary, platforms, engine_tech,
                   primary_genre, subgenre, key_mechanics, playtime_length, art_style,
                   tone, intended_audience, age_range, player_motivation, comparable_games,
                   marketing_objective, key_events_dates, call_to_action, content_restrictions,
                   competitors_to_avoid, additional_info
            FROM game_contexts
            WHERE user_id = $1 AND group_id = $2
            "#,
        )
        .bind(user_id)
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(GameContext::from)
            .ok_or_else(|| AppError::NotFound(format!("no game context for group {group_id}")))
    }

    async fn get_competitor_insights(
        &self,
        user_id: i64,
        group_id: i64,
        platform: &str,
    ) -> Result<CompetitorInsights> {
        let now: DateTime<Utc> = Utc::now();
        let window_start = now - chrono::Duration::days(14);

        let rollup = sqlx::query_as::<_, CompetitorRollupRow>(
            r#"
            SELECT
                COUNT(*) AS sample_size,
                COUNT(*)::float8 / 2.0 AS posts_per_week,
                COALESCE(MODE() WITHIN GROUP (ORDER BY EXTRACT(ISODOW FROM posted_at))::int, 1) AS best_day_iso,
                COALESCE(to_char(MODE() WITHIN GROUP (ORDER BY posted_at), 'Day'), 'Monday') AS best_day_name,
                COALESCE(AVG(likes), 0.0) AS avg_likes,
                (ARRAY_AGG(hook_text ORDER BY likes DESC))[1] AS top_hook,
                COALESCE((ARRAY_AGG(hashtags ORDER BY likes DESC))[1], ARRAY[]::text[]) AS top_hashtags,
                ARRAY(SELECT DISTINCT handle FROM competitor_posts
                      WHERE user_id = $1 AND group_id = $2 AND platform = $3) AS competitor_handles
            FROM competitor_posts
            WHERE user_id = $1 AND group_id = $2 AND platform = $3 AND posted_at >= $4
            "#,
        )
        .bind(user_id)
        .bind(group_id)
        .bind(platform)
        .bind(window_start)
        .fetch_optional(&self.pool)
        .await?;

        let best_day_iso = rollup.as_ref().map(|r| r.best_day_iso as u32).unwrap_or(1);
        let best_day_name = rollup
            .as_ref()
            .map(|r| r.best_day_name.trim().to_string())
            .unwrap_or_else(|| "Monday".to_string());

        let Some(rollup) = rollup.filter(|r| r.sample_size > 0) else {
            return Ok(CompetitorInsights::empty(best_day_iso, best_day_name));
        };

        let recommended = CompetitorInsights::recommended_from_posts_per_week(true, rollup.posts_per_week);
        let confidence = Confidence::from_sample_size(rollup.sample_size);

        Ok(CompetitorInsights {
            has_data: true,
            sample_size: rollup.sample_size,
            posts_per_week: rollup.posts_per_week,
            recommended_posts_per_week: recommended,
            best_day_iso,
            best_day_name,
            avg_likes: rollup.avg_likes,
            top_hook: rollup.top_hook,
            top_hashtags: rollup.top_hashtags,
            competitor_handles: rollup.competitor_handles,
            confidence,
            data_window_days: 14,
            strategy_cards: Vec::<StrategyCard>::new(),
        })
    }

    async fn create_workshop_document(&self, params: NewWorkshopDocument) -> Result<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO workshop_documents
                (id, user_id, group_id, filename, mime, size_bytes, sha256, storage_path, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
            "#,
        )
        .bind(id)
        .bind(params.user_id)
        .bind(params.group_id)
        .bind(&params.filename)
        .bind(&params.mime)
        .bind(params.size_bytes)
        .bind(&params.sha256)
        .bind(&params.storage_path)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn enqueue_ingest_job(&self, document_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO ingest_jobs (id, document_id, status, created_at)
            VALUES ($1, $2, 'queued', NOW())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(document_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn search_chunks(&self, query: &str, user_id: i64, group_id: i64, limit: i64) -> Result<Vec<Chunk>> {
        let rows = sqlx::query_as::<_, ChunkRow>(
            r#"
            SELECT c.document_id, c.chunk_index, c.page, c.content
            FROM chunks c
            JOIN workshop_documents d ON d.id = c.document_id
            WHERE d.user_id = $1 AND d.group_id = $2
              AND to_tsvector('english', c.content) @@ plainto_tsquery('english', $3)
            ORDER BY ts_rank(to_tsvector('english', c.content), plainto_tsquery('english', $3)) DESC
            LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(group_id)
        .bind(query)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Chunk::from).collect())
    }

    async fn fuzzy_chunks(&self, query: &str, user_id: i64, group_id: i64, limit: i64) -> Result<Vec<Chunk>> {
        let rows = sqlx::query_as::<_, ChunkRow>(
            r#"
            SELECT c.document_id, c.chunk_index, c.page, c.content
            FROM chunks c
            JOIN workshop_documents d ON d.id = c.document_id
            WHERE d.user_id = $1 AND d.group_id = $2
            ORDER BY similarity(c.content, $3) DESC
            LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(group_id)
        .bind(query)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Chunk::from).collect())
    }
}

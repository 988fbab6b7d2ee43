//! Upload-uniqueness property (spec §8): two uploads of byte-identical
//! content within the same (user, group) yield `DuplicateInGroup` on the
//! second, exercised against an in-memory `Store` stand-in for Postgres.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use marketing_core::domain::{Chunk, CompetitorInsights, GameContext, NewWorkshopDocument};
use marketing_core::error::{AppError, Result};
use marketing_core::ingestion::upload_pdf;
use marketing_core::store::Store;
use tokio_stream::once;
use uuid::Uuid;

struct InMemoryStore {
    seen: Mutex<HashSet<(i64, i64, String)>>,
}

impl InMemoryStore {
    fn new() -> Self {
        Self { seen: Mutex::new(HashSet::new()) }
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn get_game_context(&self, _user_id: i64, _group_id: i64) -> Result<GameContext> {
        unimplemented!("not exercised by the ingestion scenario")
    }

    async fn get_competitor_insights(&self, _user_id: i64, _group_id: i64, _platform: &str) -> Result<CompetitorInsights> {
        unimplemented!("not exercised by the ingestion scenario")
    }

    async fn create_workshop_document(&self, params: NewWorkshopDocument) -> Result<Uuid> {
        let key = (params.user_id, params.group_id, params.sha256.clone());
        let mut seen = self.seen.lock().unwrap();
        if !seen.insert(key) {
            return Err(AppError::DuplicateInGroup);
        }
        Ok(Uuid::new_v4())
    }

    async fn enqueue_ingest_job(&self, _document_id: Uuid) -> Result<()> {
        Ok(())
    }

    async fn search_chunks(&self, _query: &str, _user_id: i64, _group_id: i64, _limit: i64) -> Result<Vec<Chunk>> {
        Ok(Vec::new())
    }

    async fn fuzzy_chunks(&self, _query: &str, _user_id: i64, _group_id: i64, _limit: i64) -> Result<Vec<Chunk>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn second_upload_of_identical_bytes_is_rejected() {
    let store = InMemoryStore::new();
    let dir = tempfile::tempdir().unwrap();
    let bytes = bytes::Bytes::from_static(b"%PDF-1.4 fake contents for the duplicate-detection test");

    let first = upload_pdf(
        &store,
        dir.path(),
        1,
        2,
        "design-doc.pdf",
        once(Ok::<_, std::io::Error>(bytes.clone())),
    )
    .await;
    assert!(first.is_ok());

    let second = upload_pdf(
        &store,
        dir.path(),
        1,
        2,
        "design-doc.pdf",
        once(Ok::<_, std::io::Error>(bytes)),
    )
    .await;

    assert!(matches!(second, Err(AppError::DuplicateInGroup)));
}

#[tokio::test]
async fn non_pdf_filename_is_rejected_before_any_io() {
    let store = InMemoryStore::new();
    let dir = tempfile::tempdir().unwrap();
    let bytes = bytes::Bytes::from_static(b"not a pdf");

    let result = upload_pdf(&store, dir.path(), 1, 2, "notes.txt", once(Ok::<_, std::io::Error>(bytes))).await;

    assert!(matches!(result, Err(AppError::InvalidRequest(_))));
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A PDF uploaded by a studio. Unique on `(user_id, group_id, sha256)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkshopDocument {
    pub id: Uuid,
    pub user_id: i64,
    pub group_id: i64,
    pub filename: String,
    pub mime: String,
    pub size_bytes: i64,
    pub sha256: String,
    pub storage_path: String,
    pub created_at: DateTime<Utc>,
}

/// Parameters used to create a new `WorkshopDocument` row.
#[derive(Debug, Clone)]
pub struct NewWorkshopDocument {
    pub user_id: i64,
    pub group_id: i64,
    pub filename: String,
    pub mime: String,
    pub size_bytes: i64,
    pub sha256: String,
    pub storage_path: String,
}

/// A chunk produced by the external ingest worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub document_id: Uuid,
    pub chunk_index: i32,
    pub page: i32,
    pub content: String,
}

impl Chunk {
    /// Truncate to `n` characters for prompt/snippet inclusion, counting
    /// Unicode scalar values ("runes") rather than bytes.
    pub fn truncated(&self, n: usize) -> String {
        truncate_chars(&self.content, n)
    }
}

pub fn truncate_chars(s: &str, n: usize) -> String {
    if s.chars().count() <= n {
        s.to_string()
    } else {
        s.chars().take(n).collect()
    }
}

/// Opaque queue entry referencing a document; state machine lives in the
/// external ingest worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestJob {
    pub document_id: Uuid,
}

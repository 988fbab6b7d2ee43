//! PDF upload intake: hash, store at canonical path, dedupe, enqueue an
//! ingest job for the external extraction worker (spec §4.8).

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_stream::Stream;
use tokio_stream::StreamExt;
use uuid::Uuid;

use crate::domain::NewWorkshopDocument;
use crate::error::{AppError, Result};
use crate::store::Store;

pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

pub struct IngestedDocument {
    pub document_id: Uuid,
}

/// Replace spaces with `_`, then map every rune outside `[A-Za-z0-9._-]` to
/// `_`.
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .replace(' ', "_")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect()
}

pub async fn upload_pdf<S, E>(
    store: &dyn Store,
    uploads_root: &Path,
    user_id: i64,
    group_id: i64,
    filename: &str,
    mut stream: S,
) -> Result<IngestedDocument>
where
    S: Stream<Item = std::result::Result<bytes::Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(AppError::InvalidRequest("filename must end in .pdf".to_string()));
    }

    let sanitized = sanitize_filename(filename);
    let nano = Uuid::new_v4().simple().to_string();
    let tmp_dir = uploads_root.join("docs").join("tmp");
    fs::create_dir_all(&tmp_dir).await.map_err(|e| AppError::Storage(e.to_string()))?;
    let tmp_path = tmp_dir.join(format!("{user_id}_{nano}_{sanitized}"));

    let copy_result = stream_to_file_hashing(&tmp_path, &mut stream).await;
    let (size, sha256) = match copy_result {
        Ok(pair) => pair,
        Err(err) => {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(err);
        }
    };

    let unix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let final_dir = uploads_root.join("docs").join(user_id.to_string());
    if let Err(err) = fs::create_dir_all(&final_dir).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(AppError::Storage(err.to_string()));
    }
    let final_path: PathBuf = final_dir.join(format!("{unix}_{sanitized}"));

    if let Err(err) = fs::rename(&tmp_path, &final_path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(AppError::Storage(err.to_string()));
    }

    let storage_path = final_path.to_string_lossy().to_string();

    let document_id = match store
        .create_workshop_document(NewWorkshopDocument {
            user_id,
            group_id,
            filename: sanitized,
            mime: "application/pdf".to_string(),
            size_bytes: size,
            sha256,
            storage_path,
        })
        .await
    {
        Ok(id) => id,
        Err(err) => {
            let _ = fs::remove_file(&final_path).await;
            return Err(err);
        }
    };

    store.enqueue_ingest_job(document_id).await?;

    Ok(IngestedDocument { document_id })
}

async fn stream_to_file_hashing<S, E>(path: &Path, stream: &mut S) -> Result<(i64, String)>
where
    S: Stream<Item = std::result::Result<bytes::Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    let mut file = fs::File::create(path).await.map_err(|e| AppError::Storage(e.to_string()))?;
    let mut hasher = Sha256::new();
    let mut size: i64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| AppError::Storage(e.to_string()))?;
        size += chunk.len() as i64;
        if size as u64 > MAX_UPLOAD_BYTES {
            return Err(AppError::InvalidRequest("file exceeds 100 MiB limit".to_string()));
        }
        hasher.update(&chunk);
        file.write_all(&chunk).await.map_err(|e| AppError::Storage(e.to_string()))?;
    }
    file.flush().await.map_err(|e| AppError::Storage(e.to_string()))?;

    Ok((size, format!("{:x}", hasher.finalize())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_spaces_and_unsafe_runes() {
        assert_eq!(sanitize_filename("Game Design Doc (final).pdf"), "Game_Design_Doc__final_.pdf");
    }

    #[test]
    fn sanitize_preserves_safe_characters() {
        assert_eq!(sanitize_filename("design-doc_v2.pdf"), "design-doc_v2.pdf");
    }
}

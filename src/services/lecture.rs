//! Lecture upload pipeline and listing.
//!
//! DESIGN
//! ======
//! An upload is written to scratch space, compressed, read back and handed to
//! the object store; only then is the lecture row inserted. Scratch files are
//! tracked by [`ScratchFiles`] and removed when it drops, so a failure at any
//! step (including compression) leaves nothing behind in the upload dir.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use sqlx::{PgPool, Row};
use tracing::{info, warn};
use uuid::Uuid;

use super::compression::{CompressionError, Compressor};
use super::storage::{ObjectStore, StorageError};

const DEFAULT_TITLE: &str = "Untitled Lecture";
const DEFAULT_CONTENT_TYPE: &str = "video/mp4";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum LectureError {
    #[error("no video file uploaded")]
    MissingVideo,
    #[error("scratch file io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("compression failed: {0}")]
    Compression(#[from] CompressionError),
    #[error("storage failed: {0}")]
    Storage(#[from] StorageError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Row returned from lecture queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LectureRow {
    pub id: Uuid,
    pub title: String,
    pub faculty_id: Uuid,
    pub duration_secs: f64,
    pub compressed_size: i64,
    pub video_url: String,
    pub created_at_ms: i64,
}

/// Raw video received from the client.
#[derive(Debug, Clone)]
pub struct VideoUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Lecture metadata sent alongside the video.
#[derive(Debug, Clone, Default)]
pub struct LectureMeta {
    pub title: Option<String>,
    pub duration_secs: Option<f64>,
}

/// Compressed video after it has been published to the object store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedVideo {
    pub url: String,
    pub compressed_size: i64,
}

// =============================================================================
// SCRATCH FILES
// =============================================================================

/// Paths removed from disk when the guard drops.
#[derive(Debug, Default)]
pub(crate) struct ScratchFiles {
    paths: Vec<PathBuf>,
}

impl ScratchFiles {
    pub(crate) fn track(&mut self, path: PathBuf) -> PathBuf {
        self.paths.push(path.clone());
        path
    }
}

impl Drop for ScratchFiles {
    fn drop(&mut self) {
        for path in &self.paths {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "lecture: scratch cleanup failed"),
            }
        }
    }
}

// =============================================================================
// PIPELINE
// =============================================================================

/// Replace anything outside `[A-Za-z0-9._-]` so client names cannot escape
/// the scratch dir or the bucket prefix.
pub(crate) fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() { "video".to_owned() } else { cleaned.to_owned() }
}

fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

/// Compress `video` and publish it to `storage`.
///
/// # Errors
///
/// Returns `Io`, `Compression` or `Storage` for the failing step. Scratch
/// files are removed on every path.
pub async fn publish_video(
    upload_dir: &Path,
    compressor: &dyn Compressor,
    storage: &dyn ObjectStore,
    video: VideoUpload,
) -> Result<PublishedVideo, LectureError> {
    let stamp = now_ms();
    let name = sanitize_file_name(&video.file_name);
    tokio::fs::create_dir_all(upload_dir).await?;

    let mut scratch = ScratchFiles::default();
    let input = scratch.track(upload_dir.join(format!("original_{stamp}_{name}")));
    let output = scratch.track(upload_dir.join(format!("compressed_{stamp}_{name}")));

    tokio::fs::write(&input, &video.bytes).await?;
    compressor.compress(&input, &output).await?;
    let compressed = tokio::fs::read(&output).await?;
    let compressed_size = i64::try_from(compressed.len()).unwrap_or(i64::MAX);

    let content_type = video.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE);
    let object_name = format!("videos/compressed_{stamp}_{name}");
    let url = storage.put(&object_name, compressed, content_type).await?;

    info!(
        original_bytes = video.bytes.len(),
        compressed_bytes = compressed_size,
        %object_name,
        "lecture: video published"
    );
    Ok(PublishedVideo { url, compressed_size })
}

/// Insert a lecture row for a published video.
///
/// # Errors
///
/// Returns `Database` if the insert fails.
pub async fn insert_lecture(
    pool: &PgPool,
    faculty_id: Uuid,
    meta: LectureMeta,
    video: &PublishedVideo,
) -> Result<LectureRow, LectureError> {
    let title = meta
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_owned());
    let duration_secs = meta.duration_secs.unwrap_or(0.0);

    let row = sqlx::query(
        r"INSERT INTO lectures (title, faculty_id, duration_secs, compressed_size, video_url)
          VALUES ($1, $2, $3, $4, $5)
          RETURNING id, (EXTRACT(EPOCH FROM created_at) * 1000)::BIGINT AS created_at_ms",
    )
    .bind(&title)
    .bind(faculty_id)
    .bind(duration_secs)
    .bind(video.compressed_size)
    .bind(&video.url)
    .fetch_one(pool)
    .await?;

    Ok(LectureRow {
        id: row.get("id"),
        title,
        faculty_id,
        duration_secs,
        compressed_size: video.compressed_size,
        video_url: video.url.clone(),
        created_at_ms: row.get("created_at_ms"),
    })
}

/// List all lectures, newest first.
///
/// # Errors
///
/// Returns `Database` if the query fails.
pub async fn list_lectures(pool: &PgPool) -> Result<Vec<LectureRow>, LectureError> {
    let rows = sqlx::query(
        r"SELECT id, title, faculty_id, duration_secs, compressed_size, video_url,
                 (EXTRACT(EPOCH FROM created_at) * 1000)::BIGINT AS created_at_ms
          FROM lectures
          ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| LectureRow {
            id: r.get("id"),
            title: r.get("title"),
            faculty_id: r.get("faculty_id"),
            duration_secs: r.get("duration_secs"),
            compressed_size: r.get("compressed_size"),
            video_url: r.get("video_url"),
            created_at_ms: r.get("created_at_ms"),
        })
        .collect())
}

#[cfg(test)]
#[path = "lecture_test.rs"]
mod tests;

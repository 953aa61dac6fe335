//! Lecture routes: upload and listing.
//!
//! ERROR HANDLING
//! ==============
//! Failures are mapped by [`lecture_error_to_status`] and reported as
//! `{"error": ...}` bodies. Collaborator details stay in the logs.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use super::auth::AuthUser;
use crate::services::lecture::{self, LectureError, LectureMeta, VideoUpload};
use crate::state::AppState;

const VIDEO_FIELD: &str = "video";
const TITLE_FIELD: &str = "title";
const DURATION_FIELD: &str = "duration";

pub(crate) fn lecture_error_to_status(err: &LectureError) -> StatusCode {
    match err {
        LectureError::MissingVideo => StatusCode::BAD_REQUEST,
        LectureError::Io(_) | LectureError::Compression(_) | LectureError::Storage(_) | LectureError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(err: &LectureError) -> Response {
    let status = lecture_error_to_status(err);
    let message = match err {
        LectureError::MissingVideo => "No video file uploaded",
        _ => "Internal Server Error",
    };
    if status.is_server_error() {
        tracing::error!(error = %err, "lecture: request failed");
    }
    (status, Json(json!({ "error": message }))).into_response()
}

/// Parsed multipart form. Unknown fields are ignored.
#[derive(Debug, Default)]
pub(crate) struct UploadForm {
    pub video: Option<VideoUpload>,
    pub meta: LectureMeta,
}

pub(crate) fn parse_duration(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|d| d.is_finite() && *d >= 0.0)
}

async fn read_form(multipart: &mut Multipart) -> Result<UploadForm, StatusCode> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| e.status())? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(VIDEO_FIELD) => {
                let file_name = field.file_name().unwrap_or("video.mp4").to_owned();
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await.map_err(|e| e.status())?;
                if !bytes.is_empty() {
                    form.video = Some(VideoUpload { file_name, content_type, bytes: bytes.to_vec() });
                }
            }
            Some(TITLE_FIELD) => {
                form.meta.title = Some(field.text().await.map_err(|e| e.status())?);
            }
            Some(DURATION_FIELD) => {
                form.meta.duration_secs = parse_duration(&field.text().await.map_err(|e| e.status())?);
            }
            _ => {}
        }
    }
    Ok(form)
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/lectures/upload` — compress, store and record a lecture video.
pub async fn upload(State(state): State<AppState>, auth: AuthUser, mut multipart: Multipart) -> Response {
    let form = match read_form(&mut multipart).await {
        Ok(form) => form,
        Err(status) => return (status, Json(json!({ "error": "Invalid upload" }))).into_response(),
    };
    let Some(video) = form.video else {
        return error_response(&LectureError::MissingVideo);
    };

    let published =
        match lecture::publish_video(&state.upload_dir, state.compressor.as_ref(), state.storage.as_ref(), video).await {
            Ok(published) => published,
            Err(e) => return error_response(&e),
        };

    match lecture::insert_lecture(&state.pool, auth.user.id, form.meta, &published).await {
        Ok(row) => {
            tracing::info!(lecture_id = %row.id, faculty = %auth.user.name, "lecture: uploaded");
            (
                StatusCode::CREATED,
                Json(json!({ "message": "Lecture uploaded successfully", "lecture": row })),
            )
                .into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// `GET /api/lectures` — all lectures, newest first.
pub async fn list(State(state): State<AppState>) -> Response {
    match lecture::list_lectures(&state.pool).await {
        Ok(lectures) => Json(json!({ "lectures": lectures })).into_response(),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
#[path = "lectures_test.rs"]
mod tests;

//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the chat and lecture APIs, the health probe and static
//! files under a single Axum router. Locally stored media is served under
//! `/media`; everything else unmatched falls through to `PUBLIC_DIR`.
//!
//! ERROR HANDLING
//! ==============
//! A panic inside any handler is caught and turned into a 500 with
//! `{"error":"Server error"}` so clients always receive JSON.

pub mod auth;
pub mod chat;
pub mod lectures;

use std::any::Any;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{ServerConfig, StorageConfig};
use crate::services::storage::LOCAL_MEDIA_ROUTE;
use crate::state::AppState;

/// Largest accepted chat request body.
pub const CHAT_BODY_LIMIT: usize = 100 * 1024;

/// Full application router.
pub fn app(state: AppState, config: &ServerConfig) -> Router {
    let api = Router::new()
        .route(faq::CHAT_PATH, post(chat::chat).layer(DefaultBodyLimit::max(CHAT_BODY_LIMIT)))
        .route("/api/lectures", get(lectures::list))
        .route(
            "/api/lectures/upload",
            post(lectures::upload).layer(DefaultBodyLimit::max(config.upload_max_bytes)),
        )
        .route("/healthz", get(healthz))
        .with_state(state);

    let api = match &config.storage {
        StorageConfig::Local { dir, .. } => api.nest_service(LOCAL_MEDIA_ROUTE, ServeDir::new(dir)),
        StorageConfig::Gcs { .. } => api,
    };

    let site = ServeDir::new(&config.public_dir).append_index_html_on_directories(true);
    with_layers(api.fallback_service(site), config.cors_origin.as_deref())
}

/// Wrap `router` with panic recovery, request tracing and CORS.
pub(crate) fn with_layers(router: Router, cors_origin: Option<&str>) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origin))
}

/// A configured origin gets credentialed CORS; otherwise any origin is allowed.
pub(crate) fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let Some(raw) = origin else {
        return open_cors();
    };
    match raw.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        Err(_) => {
            tracing::warn!(origin = raw, "invalid CORS_ORIGIN; allowing any origin");
            open_cors()
        }
    }
}

fn open_cors() -> CorsLayer {
    CorsLayer::new().allow_origin(cors::Any).allow_methods(cors::Any).allow_headers(cors::Any)
}

pub(crate) fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(%detail, "handler panicked");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(serde_json::json!({ "error": "Server error" }))).into_response()
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

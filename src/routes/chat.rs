//! Chat route: `POST /api/chat`.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Json;
use faq::{ChatRequest, ChatResponse};

use crate::services::chat as chat_svc;
use crate::state::AppState;

/// `POST /api/chat` — answer a user message.
///
/// The body is read raw and decoded leniently, so malformed input still gets
/// the fallback reply with 200 instead of a 4xx.
pub async fn chat(State(state): State<AppState>, body: Bytes) -> Json<ChatResponse> {
    let request = ChatRequest::from_body(&body);
    Json(chat_svc::respond(state.matcher.as_ref(), state.faq, &request.text, request.lang))
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;

//! Chat responder: builds the reply envelope for `POST /api/chat`.
//!
//! DESIGN
//! ======
//! The responder is a pure function of the matcher, the intent table and the
//! request. A hit returns the intent's answer with no chips; a miss returns
//! the table's fallback text together with its fixed suggestion chips. No
//! randomness and no shared mutable state, so identical requests always get
//! identical replies.

use faq::{ChatResponse, IntentTable, Lang, Matcher, ResponseMeta};
use tracing::debug;

/// `meta.source` for a rule hit.
pub const KB_SOURCE: &str = "kb";
/// `meta.source` when the fallback answer is used.
pub const FALLBACK_SOURCE: &str = "fallback";
/// `meta.confidence` reported with the fallback answer.
pub const FALLBACK_CONFIDENCE: f32 = 0.3;

/// Answer `text` from `matcher`, falling back to the table's default reply.
///
/// `lang` is the caller's display language; replies always carry both
/// languages, so it only feeds the logs.
#[must_use]
pub fn respond(matcher: &dyn Matcher, table: &IntentTable, text: &str, lang: Lang) -> ChatResponse {
    match matcher.find(text) {
        Some(hit) => {
            debug!(%lang, intent = %hit.intent, confidence = hit.confidence, "chat: intent matched");
            ChatResponse {
                reply: hit.answer,
                suggestions: Vec::new(),
                meta: Some(ResponseMeta {
                    source: KB_SOURCE.to_owned(),
                    confidence: hit.confidence,
                    intent: Some(hit.intent),
                }),
            }
        }
        None => {
            debug!(%lang, chars = text.chars().count(), "chat: no intent matched, using fallback");
            ChatResponse {
                reply: table.fallback().clone(),
                suggestions: table.suggestions().to_vec(),
                meta: Some(ResponseMeta {
                    source: FALLBACK_SOURCE.to_owned(),
                    confidence: FALLBACK_CONFIDENCE,
                    intent: None,
                }),
            }
        }
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;

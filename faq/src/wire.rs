//! JSON bodies exchanged on `POST /api/chat`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::text::{BilingualText, Lang};

/// Route of the chat endpoint, relative to the server base URL.
pub const CHAT_PATH: &str = "/api/chat";

/// Chat request: `{ "text": string, "lang"?: "en" | "hi" }`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub text: String,
    pub lang: Lang,
}

impl ChatRequest {
    /// Decode a request body without ever rejecting it.
    ///
    /// Unparsable JSON, a missing or non-string `text`, and a missing or
    /// unknown `lang` all fall back to defaults (`""` and `en`).
    #[must_use]
    pub fn from_body(bytes: &[u8]) -> Self {
        let value: Value = serde_json::from_slice(bytes).unwrap_or(Value::Null);
        let text = value
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let lang = value
            .get("lang")
            .and_then(Value::as_str)
            .and_then(Lang::from_tag)
            .unwrap_or_default();
        Self { text, lang }
    }
}

/// Chat response envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: BilingualText,
    #[serde(default)]
    pub suggestions: Vec<BilingualText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

/// Where a reply came from and how sure the matcher was.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    pub source: String,
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
}

#[cfg(test)]
#[path = "wire_test.rs"]
mod tests;

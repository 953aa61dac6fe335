//! Remote client adapter.
//!
//! DESIGN
//! ======
//! `send` runs the local matcher over the embedded FAQ table first and only
//! calls the server on a miss, at most once per message. The remote call is
//! raced against a hard timeout with `tokio::time::timeout`; when the timer
//! wins, the request future is dropped, which aborts it, so a late response
//! has nothing to be delivered to.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is an [`Outcome`] value. `send` never panics and never
//! returns `Err`.

use std::sync::Arc;
use std::time::Duration;

use faq::{BilingualText, ChatRequest, Lang, Matcher, RuleMatcher};
use serde_json::Value;
use tracing::{debug, warn};

use super::transport::{ChatTransport, HttpTransport, TransportError};

/// Upper bound on one remote call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of sending one message.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// Answered from the embedded table; no request was made.
    LocalAnswer { reply: BilingualText },
    /// Answered by the server.
    RemoteAnswer { reply: BilingualText, suggestions: Vec<BilingualText> },
    /// The server did not answer in time.
    Timeout,
    /// The request failed before a usable body arrived.
    Network(String),
    /// The server answered without both reply languages.
    NoAnswer,
}

impl Outcome {
    /// Text for the error notice, or `None` for an answer.
    #[must_use]
    pub fn error_text(&self) -> Option<String> {
        match self {
            Self::LocalAnswer { .. } | Self::RemoteAnswer { .. } => None,
            Self::Timeout => Some("request timed out".to_owned()),
            Self::Network(message) => Some(message.clone()),
            Self::NoAnswer => Some("no answer in response".to_owned()),
        }
    }
}

/// Answers messages locally when possible, remotely otherwise.
#[derive(Clone)]
pub struct ChatAdapter {
    matcher: Arc<dyn Matcher>,
    transport: Arc<dyn ChatTransport>,
    timeout: Duration,
}

impl ChatAdapter {
    /// Adapter over the built-in table with the given transport.
    #[must_use]
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self { matcher: Arc::new(RuleMatcher::builtin()), transport, timeout: DEFAULT_TIMEOUT }
    }

    /// Adapter posting to `{base_url}/api/chat` over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn http(base_url: &str) -> Result<Self, TransportError> {
        Ok(Self::new(Arc::new(HttpTransport::new(base_url)?)))
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_matcher(mut self, matcher: Arc<dyn Matcher>) -> Self {
        self.matcher = matcher;
        self
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Answer `text`, sending `lang` to the server on a local miss.
    pub async fn send(&self, text: &str, lang: Lang) -> Outcome {
        if let Some(hit) = self.matcher.find(text) {
            debug!(intent = %hit.intent, "adapter: local answer");
            return Outcome::LocalAnswer { reply: hit.answer };
        }

        let request = ChatRequest { text: text.to_owned(), lang };
        match tokio::time::timeout(self.timeout, self.transport.post_chat(&request)).await {
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis(), "adapter: request timed out");
                Outcome::Timeout
            }
            Ok(Err(e)) => {
                warn!(error = %e, "adapter: request failed");
                Outcome::Network(e.to_string())
            }
            Ok(Ok(body)) => match parse_reply(&body) {
                Some((reply, suggestions)) => Outcome::RemoteAnswer { reply, suggestions },
                None => {
                    warn!("adapter: response missing reply text");
                    Outcome::NoAnswer
                }
            },
        }
    }
}

/// Non-empty string at `key`.
fn text_field<'v>(value: &'v Value, key: &str) -> Option<&'v str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Reply and chips from a response body; `None` unless both reply languages
/// are present. Malformed chips are skipped, a chip without `hi` shows `en`.
pub(crate) fn parse_reply(body: &Value) -> Option<(BilingualText, Vec<BilingualText>)> {
    let reply = body.get("reply")?;
    let reply = BilingualText::new(text_field(reply, "en")?, text_field(reply, "hi")?);

    let suggestions = body
        .get("suggestions")
        .and_then(Value::as_array)
        .map(|chips| {
            chips
                .iter()
                .filter_map(|chip| {
                    let en = text_field(chip, "en")?;
                    Some(BilingualText::new(en, text_field(chip, "hi").unwrap_or(en)))
                })
                .collect()
        })
        .unwrap_or_default();

    Some((reply, suggestions))
}

#[cfg(test)]
#[path = "adapter_test.rs"]
mod tests;

//! HTTP transport for the chat endpoint.
//!
//! ERROR HANDLING
//! ==============
//! Connection failures, non-2xx statuses and undecodable bodies all surface
//! as [`TransportError`]. The body is returned as raw JSON so the adapter can
//! decide whether a reply is usable.

use faq::{CHAT_PATH, ChatRequest};
use reqwest::header;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("{0}")]
    Request(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Sends one chat request and returns the decoded JSON body.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the request cannot be completed.
    async fn post_chat(&self, request: &ChatRequest) -> Result<Value, TransportError>;
}

/// `reqwest` transport posting JSON to `{base}/api/chat`.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http: reqwest::Client,
    url: String,
}

/// Chat endpoint URL for `base`; an empty base yields the bare path.
#[must_use]
pub fn chat_url(base: &str) -> String {
    format!("{}{CHAT_PATH}", base.trim().trim_end_matches('/'))
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(Self { http, url: chat_url(base_url) })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl ChatTransport for HttpTransport {
    async fn post_chat(&self, request: &ChatRequest) -> Result<Value, TransportError> {
        let response = self
            .http
            .post(&self.url)
            .header(header::ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;

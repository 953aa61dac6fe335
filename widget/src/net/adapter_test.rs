use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;

// =========================================================================
// Mocks
// =========================================================================

/// Counts calls and answers each with `respond()`.
struct ScriptedTransport {
    calls: AtomicUsize,
    respond: fn() -> Result<Value, TransportError>,
}

impl ScriptedTransport {
    fn new(respond: fn() -> Result<Value, TransportError>) -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), respond })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ChatTransport for ScriptedTransport {
    async fn post_chat(&self, _request: &ChatRequest) -> Result<Value, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.respond)()
    }
}

/// Answers correctly, but only after `delay`.
struct SlowTransport {
    delay: Duration,
}

#[async_trait::async_trait]
impl ChatTransport for SlowTransport {
    async fn post_chat(&self, _request: &ChatRequest) -> Result<Value, TransportError> {
        tokio::time::sleep(self.delay).await;
        Ok(json!({ "reply": { "en": "late", "hi": "देर" } }))
    }
}

fn fallback_body() -> Result<Value, TransportError> {
    Ok(json!({
        "reply": { "en": "I don't have an answer for that yet.", "hi": "मेरे पास अभी इसके लिए उत्तर उपलब्ध नहीं है।" },
        "suggestions": [{ "en": "How to join class?", "hi": "क्लास में कैसे जुड़ें?" }],
        "meta": { "source": "fallback", "confidence": 0.3 }
    }))
}

// =========================================================================
// local first
// =========================================================================

#[tokio::test]
async fn local_hit_makes_no_request() {
    let transport = ScriptedTransport::new(fallback_body);
    let adapter = ChatAdapter::new(transport.clone());

    let outcome = adapter.send("How do I join class?", Lang::En).await;

    assert!(matches!(outcome, Outcome::LocalAnswer { ref reply } if reply.en.starts_with("To join a class")));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn miss_makes_exactly_one_request() {
    let transport = ScriptedTransport::new(fallback_body);
    let adapter = ChatAdapter::new(transport.clone());

    let outcome = adapter.send("what is the weather", Lang::Hi).await;

    let Outcome::RemoteAnswer { reply, suggestions } = outcome else {
        panic!("expected remote answer, got {outcome:?}");
    };
    assert_eq!(reply.en, "I don't have an answer for that yet.");
    assert_eq!(suggestions.len(), 1);
    assert_eq!(transport.calls(), 1);
}

/// Answers every message with the same text.
struct EverythingMatcher;

impl Matcher for EverythingMatcher {
    fn find(&self, _text: &str) -> Option<faq::IntentMatch> {
        Some(faq::IntentMatch {
            intent: "everything".into(),
            answer: BilingualText::new("always", "हमेशा"),
            confidence: 1.0,
        })
    }
}

#[tokio::test]
async fn custom_matcher_replaces_the_builtin_table() {
    let transport = ScriptedTransport::new(fallback_body);
    let adapter = ChatAdapter::new(transport.clone()).with_matcher(Arc::new(EverythingMatcher));

    let outcome = adapter.send("what is the weather", Lang::Hi).await;

    assert_eq!(outcome, Outcome::LocalAnswer { reply: BilingualText::new("always", "हमेशा") });
    assert_eq!(transport.calls(), 0);
}

// =========================================================================
// failures
// =========================================================================

#[tokio::test]
async fn reply_without_hindi_is_no_answer() {
    let transport = ScriptedTransport::new(|| Ok(json!({ "reply": { "en": "only english" } })));
    let adapter = ChatAdapter::new(transport);

    assert_eq!(adapter.send("weather", Lang::En).await, Outcome::NoAnswer);
}

#[tokio::test]
async fn body_without_reply_is_no_answer() {
    let transport = ScriptedTransport::new(|| Ok(json!({ "error": "Server error" })));
    let adapter = ChatAdapter::new(transport);

    assert_eq!(adapter.send("weather", Lang::En).await, Outcome::NoAnswer);
}

#[tokio::test]
async fn transport_failure_is_network_error() {
    let transport = ScriptedTransport::new(|| Err(TransportError::Status(500)));
    let adapter = ChatAdapter::new(transport);

    let outcome = adapter.send("weather", Lang::En).await;

    assert_eq!(outcome, Outcome::Network("HTTP 500".into()));
    assert_eq!(outcome.error_text().as_deref(), Some("HTTP 500"));
}

#[tokio::test(start_paused = true)]
async fn slow_server_times_out_at_the_deadline() {
    let adapter = ChatAdapter::new(Arc::new(SlowTransport { delay: Duration::from_secs(30) }));
    let started = tokio::time::Instant::now();

    let outcome = adapter.send("weather", Lang::En).await;

    assert_eq!(outcome, Outcome::Timeout);
    let elapsed = started.elapsed();
    assert!(elapsed >= DEFAULT_TIMEOUT, "returned early: {elapsed:?}");
    assert!(elapsed < DEFAULT_TIMEOUT + Duration::from_millis(50), "returned late: {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn custom_timeout_is_honoured() {
    let adapter = ChatAdapter::new(Arc::new(SlowTransport { delay: Duration::from_secs(3) }))
        .with_timeout(Duration::from_secs(5));
    assert_eq!(adapter.timeout(), Duration::from_secs(5));

    let outcome = adapter.send("weather", Lang::En).await;

    assert!(matches!(outcome, Outcome::RemoteAnswer { ref reply, .. } if reply.en == "late"));
}

// =========================================================================
// parse_reply
// =========================================================================

#[test]
fn parse_reply_skips_bad_chips_and_fills_missing_hindi() {
    let body = json!({
        "reply": { "en": "a", "hi": "b" },
        "suggestions": [{ "en": "one" }, { "hi": "no english" }, "bare string", { "en": "two", "hi": "दो" }]
    });
    let (reply, chips) = parse_reply(&body).unwrap();
    assert_eq!(reply, BilingualText::new("a", "b"));
    assert_eq!(chips, vec![BilingualText::new("one", "one"), BilingualText::new("two", "दो")]);
}

#[test]
fn parse_reply_tolerates_missing_or_odd_suggestions() {
    let (_, chips) = parse_reply(&json!({ "reply": { "en": "a", "hi": "b" } })).unwrap();
    assert!(chips.is_empty());
    let (_, chips) = parse_reply(&json!({ "reply": { "en": "a", "hi": "b" }, "suggestions": "x" })).unwrap();
    assert!(chips.is_empty());
}

#[test]
fn parse_reply_rejects_empty_text() {
    assert!(parse_reply(&json!({ "reply": { "en": "", "hi": "b" } })).is_none());
    assert!(parse_reply(&json!({ "reply": "text" })).is_none());
}

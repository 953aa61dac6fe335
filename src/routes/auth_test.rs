use super::*;
use axum::extract::FromRequestParts;
use axum::http::{HeaderValue, Request};

use crate::state::test_helpers;

fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in pairs {
        map.append(name.clone(), HeaderValue::from_str(value).unwrap());
    }
    map
}

#[test]
fn token_from_cookie() {
    let h = headers(&[(header::COOKIE, "theme=dark; session_token=abc123")]);
    assert_eq!(session_token(&h).as_deref(), Some("abc123"));
}

#[test]
fn token_from_bearer_header() {
    let h = headers(&[(header::AUTHORIZATION, "Bearer  tok-9 ")]);
    assert_eq!(session_token(&h).as_deref(), Some("tok-9"));
}

#[test]
fn cookie_wins_over_bearer() {
    let h = headers(&[(header::COOKIE, "session_token=from-cookie"), (header::AUTHORIZATION, "Bearer from-header")]);
    assert_eq!(session_token(&h).as_deref(), Some("from-cookie"));
}

#[test]
fn empty_or_foreign_credentials_are_ignored() {
    assert_eq!(session_token(&HeaderMap::new()), None);
    assert_eq!(session_token(&headers(&[(header::COOKIE, "session_token=")])), None);
    assert_eq!(session_token(&headers(&[(header::AUTHORIZATION, "Basic dXNlcjpwdw==")])), None);
    assert_eq!(session_token(&headers(&[(header::AUTHORIZATION, "Bearer ")])), None);
}

#[tokio::test]
async fn missing_token_is_rejected_without_db() {
    let state = test_helpers::test_app_state();
    let (mut parts, ()) = Request::builder().uri("/api/lectures/upload").body(()).unwrap().into_parts();
    let result = AuthUser::from_request_parts(&mut parts, &state).await;
    assert_eq!(result.err(), Some(StatusCode::UNAUTHORIZED));
}

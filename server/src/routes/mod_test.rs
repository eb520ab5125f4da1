use axum::http::StatusCode;

use super::test_support;
use crate::state::test_helpers;

#[tokio::test]
async fn healthz_is_ok_without_auth() {
    let (state, _store) = test_helpers::memory_state();
    let (status, body) = test_support::get(&state, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (state, _store) = test_helpers::memory_state();
    let (status, _) = test_support::get(&state, "/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_preflight_allows_authorization_header() {
    use axum::body::Body;
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    let (state, _store) = test_helpers::memory_state();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/admin/users")
        .header("origin", "http://localhost:8080")
        .header("access-control-request-method", "GET")
        .header("access-control-request-headers", "authorization")
        .body(Body::empty())
        .unwrap();
    let response = super::app(state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let allowed = response.headers()["access-control-allow-headers"].to_str().unwrap().to_ascii_lowercase();
    assert!(allowed.contains("authorization"));
}

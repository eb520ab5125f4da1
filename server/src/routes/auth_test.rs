use axum::http::{Method, StatusCode};
use roster_session::Role;
use serde_json::json;

use super::*;
use crate::routes::test_support::{get, post, send};
use crate::state::test_helpers;

// =============================================================================
// register
// =============================================================================

#[tokio::test]
async fn register_returns_201_with_user_and_token() {
    let (state, _store) = test_helpers::memory_state();
    let (status, body) = post(
        &state,
        "/api/auth/register",
        None,
        json!({"username": "neo", "email": "neo@matrix.io", "password": "whiterabbit"}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["username"], "neo");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());
    assert_eq!(body["token"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn register_validation_and_conflict_statuses() {
    let (state, store) = test_helpers::memory_state();
    test_helpers::seed_user(store.as_ref(), "neo", Role::User).await;

    let (status, body) = post(
        &state,
        "/api/auth/register",
        None,
        json!({"username": "trinity", "email": "t@matrix.io", "password": "short"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("password"));

    let (status, body) = post(
        &state,
        "/api/auth/register",
        None,
        json!({"username": "neo", "email": "other@matrix.io", "password": "longenough"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "username already in use");
}

#[tokio::test]
async fn malformed_json_body_is_400_with_message() {
    let (state, _store) = test_helpers::memory_state();
    let (status, body) = post(&state, "/api/auth/register", None, json!({"username": "neo"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

// =============================================================================
// login
// =============================================================================

#[tokio::test]
async fn login_returns_usable_token() {
    let (state, store) = test_helpers::memory_state();
    test_helpers::seed_user(store.as_ref(), "neo", Role::User).await;

    let (status, body) = post(
        &state,
        "/api/auth/login",
        None,
        json!({"login": "neo@example.com", "password": test_helpers::SEED_PASSWORD}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let token = body["token"].as_str().unwrap();
    let (status, me) = get(&state, "/api/users/me", Some(token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "neo");
}

#[tokio::test]
async fn login_failures_share_one_401_body() {
    let (state, store) = test_helpers::memory_state();
    test_helpers::seed_user(store.as_ref(), "neo", Role::User).await;

    let unknown = post(&state, "/api/auth/login", None, json!({"login": "smith", "password": "whatever1"})).await;
    let wrong = post(&state, "/api/auth/login", None, json!({"login": "neo", "password": "whatever1"})).await;

    assert_eq!(unknown.0, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, wrong);
    assert_eq!(unknown.1, json!({"message": "Invalid credentials"}));
}

// =============================================================================
// logout / extractor
// =============================================================================

#[tokio::test]
async fn logout_revokes_the_session() {
    let (state, _store) = test_helpers::memory_state();
    let (_user, token) = test_helpers::seed_session(&state, "neo", Role::User).await;

    let (status, body) = send(&state, Method::POST, "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, body) = get(&state, "/api/users/me", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn missing_bearer_is_401() {
    let (state, _store) = test_helpers::memory_state();
    let (status, body) = send(&state, Method::POST, "/api/auth/logout", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn expired_session_is_401() {
    let (state, store) = test_helpers::memory_state();
    let (_user, token) = test_helpers::seed_session(&state, "neo", Role::User).await;
    store.expire_all_sessions();
    let (status, _) = get(&state, "/api/users/me", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_store_fault_is_500_server_error() {
    let (state, store) = test_helpers::memory_state();
    let (_user, token) = test_helpers::seed_session(&state, "neo", Role::User).await;
    store.set_failing(true);
    let (status, body) = get(&state, "/api/users/me", Some(&token)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Server error");
}

#[test]
fn auth_error_mapping() {
    assert_eq!(ApiError::from(auth_svc::AuthError::InvalidCredentials).status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ApiError::from(auth_svc::AuthError::Conflict("email")).status(), StatusCode::CONFLICT);
}

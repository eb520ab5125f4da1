use futures::executor::block_on;

use super::*;
use crate::storage::{MemoryStorage, TOKEN_KEY, USER_KEY};
use crate::test_support::{ScriptedTransport, sample_user, sample_user_json};

fn store_with_token(token: &str) -> TokenStore<MemoryStorage> {
    let mut store = TokenStore::new(MemoryStorage::new());
    store.set_credential(Some(token));
    store
}

// =============================================================================
// attach_auth
// =============================================================================

#[test]
fn attach_auth_sets_bearer_header() {
    let request = attach_auth(HttpRequest::new(Method::Get, "/api/users/me"), "tok123");
    assert_eq!(request.header("authorization"), Some("Bearer tok123"));
}

#[test]
fn attach_auth_replaces_existing_authorization() {
    let request = HttpRequest::new(Method::Get, "/x").with_header("authorization", "Bearer old");
    let request = attach_auth(request, "new");
    assert_eq!(request.headers.len(), 1);
    assert_eq!(request.header(AUTHORIZATION), Some("Bearer new"));
}

#[test]
fn attach_auth_keeps_other_headers_and_body() {
    let request = HttpRequest::new(Method::Put, "/x")
        .json(&serde_json::json!({"role": "admin"}))
        .unwrap();
    let request = attach_auth(request, "t");
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.body.as_deref(), Some(r#"{"role":"admin"}"#));
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let client = AuthClient::new("http://localhost:3000/api/", ScriptedTransport::new());
    assert_eq!(client.base_url(), "http://localhost:3000/api");
}

// =============================================================================
// load_current_user
// =============================================================================

#[test]
fn load_without_token_fails_without_request() {
    let client = AuthClient::new("/api", ScriptedTransport::new());
    let store = TokenStore::new(MemoryStorage::new());
    let err = block_on(client.load_current_user(&store)).unwrap_err();
    assert!(matches!(err, AuthClientError::NoCredential));
    assert_eq!(client.transport.sent(), 0);
}

#[test]
fn load_success_returns_user_and_token() {
    let client = AuthClient::new("/api", ScriptedTransport::new().reply(200, &sample_user_json()));
    let store = store_with_token("tok123");
    let session = block_on(client.load_current_user(&store)).unwrap();
    assert_eq!(session.user, sample_user());
    assert_eq!(session.token, "tok123");

    let request = client.transport.last_request();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url, "/api/users/me");
    assert_eq!(request.header(AUTHORIZATION), Some("Bearer tok123"));
}

#[test]
fn load_rejection_carries_server_message_and_leaves_storage() {
    let client = AuthClient::new("/api", ScriptedTransport::new().reply(401, r#"{"message":"Invalid token"}"#));
    let mut store = store_with_token("stale");
    store.persist_user(&sample_user());
    let err = block_on(client.load_current_user(&store)).unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.server_message(), Some("Invalid token"));
    assert_eq!(store.storage().get(TOKEN_KEY).as_deref(), Some("stale"));
    assert!(store.storage().get(USER_KEY).is_some());
}

#[test]
fn load_rejection_without_body_has_no_server_message() {
    let client = AuthClient::new("/api", ScriptedTransport::new().reply(500, ""));
    let err = block_on(client.load_current_user(&store_with_token("t"))).unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.server_message(), None);
}

#[test]
fn load_network_failure_is_transport_error() {
    let client = AuthClient::new("/api", ScriptedTransport::new().fail("connection refused"));
    let store = store_with_token("t");
    let err = block_on(client.load_current_user(&store)).unwrap_err();
    assert!(matches!(err, AuthClientError::Transport(_)));
    assert_eq!(store.token().as_deref(), Some("t"));
}

#[test]
fn load_undecodable_body_is_decode_error() {
    let client = AuthClient::new("/api", ScriptedTransport::new().reply(200, "<html>"));
    let err = block_on(client.load_current_user(&store_with_token("t"))).unwrap_err();
    assert!(matches!(err, AuthClientError::Decode(_)));
}

// =============================================================================
// Admin calls
// =============================================================================

#[test]
fn update_role_sends_put_with_json_and_bearer() {
    let body = serde_json::json!({"message": "User role updated successfully", "user": sample_user()});
    let client = AuthClient::new("/api", ScriptedTransport::new().reply(200, &body.to_string()));
    let updated = block_on(client.update_role("admintok", "1", "admin")).unwrap();
    assert_eq!(updated.message, "User role updated successfully");

    let request = client.transport.last_request();
    assert_eq!(request.method, Method::Put);
    assert_eq!(request.url, "/api/admin/users/1/role");
    assert_eq!(request.header(AUTHORIZATION), Some("Bearer admintok"));
    assert_eq!(request.body.as_deref(), Some(r#"{"role":"admin"}"#));
}

#[test]
fn delete_user_not_found_is_rejected_404() {
    let client = AuthClient::new("/api", ScriptedTransport::new().reply(404, r#"{"message":"User not found"}"#));
    let err = block_on(client.delete_user("t", "missing")).unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.server_message(), Some("User not found"));
}

#[test]
fn logout_accepts_empty_204() {
    let client = AuthClient::new("/api", ScriptedTransport::new().reply(204, ""));
    block_on(client.logout("t")).unwrap();
    assert_eq!(client.transport.last_request().url, "/api/auth/logout");
}

#[test]
fn login_posts_credentials() {
    let body = serde_json::json!({"user": sample_user(), "token": "fresh"});
    let client = AuthClient::new("/api", ScriptedTransport::new().reply(200, &body.to_string()));
    let session = block_on(client.login("a", "hunter22")).unwrap();
    assert_eq!(session.token, "fresh");
    let request = client.transport.last_request();
    assert_eq!(request.header(AUTHORIZATION), None);
    let sent: serde_json::Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(sent["login"], "a");
}

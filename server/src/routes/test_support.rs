//! Request helpers for route tests. Requests run through the real router via
//! `tower::ServiceExt::oneshot`.

use axum::body::{Body, to_bytes};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use crate::state::AppState;

/// Send one request and return the status plus the parsed JSON body
/// (`Value::Null` when the body is empty).
pub async fn send(state: &AppState, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = super::app(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

pub async fn get(state: &AppState, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(state, Method::GET, uri, token, None).await
}

pub async fn post(state: &AppState, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
    send(state, Method::POST, uri, token, Some(body)).await
}

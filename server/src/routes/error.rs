//! HTTP error type shared by every handler.
//!
//! Every error body is `{"message": string}`. Server faults log the
//! underlying cause and send only a fixed generic message.

use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use roster_session::types::MessageResponse;

use crate::services::auth::AuthError;
use crate::services::users::UserError;

pub const SERVER_ERROR: &str = "Server error";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    ServerFault(&'static str),
}

impl ApiError {
    /// Log `source` and produce a 500 carrying only `message`.
    pub fn server_fault(message: &'static str, source: &dyn std::fmt::Display) -> Self {
        tracing::error!(error = %source, "{message}");
        Self::ServerFault(message)
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ServerFault(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(MessageResponse::new(self.to_string()))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Invalid(e) => Self::InvalidInput(e.to_string()),
            AuthError::InvalidCredentials => Self::Unauthorized("Invalid credentials"),
            AuthError::Conflict(field) => Self::Conflict(format!("{field} already in use")),
            AuthError::PasswordHash | AuthError::Store(_) => Self::server_fault(SERVER_ERROR, &err),
        }
    }
}

/// Translate a user-service error, using `fault` as the 500 message.
pub fn user_error(err: UserError, fault: &'static str) -> ApiError {
    match err {
        UserError::NotFound => ApiError::NotFound("User not found"),
        UserError::InvalidRole(_) => ApiError::InvalidInput("Invalid role".to_owned()),
        UserError::Invalid(e) => ApiError::InvalidInput(e.to_string()),
        UserError::Conflict(field) => ApiError::Conflict(format!("{field} already in use")),
        UserError::Store(e) => ApiError::server_fault(fault, &e),
    }
}

/// `axum::Json` whose rejection renders as an [`ApiError`] body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

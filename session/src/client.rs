//! Auth client: per-call bearer attachment and typed API calls.
//!
//! SYSTEM CONTEXT
//! ==============
//! The SPA and the CLI talk to the same HTTP API through [`AuthClient`]. The
//! concrete HTTP stack (`gloo-net` in the browser, `reqwest` in the CLI) sits
//! behind [`Transport`], so this module stays free of I/O.
//!
//! ERROR HANDLING
//! ==============
//! Calls surface every failure as [`AuthClientError`]. No call here mutates
//! durable storage: invalidating a rejected credential is the auth state
//! container's job.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::storage::{DurableStorage, TokenStore};
use crate::types::{
    LoginRequest, MessageResponse, RegisterRequest, RoleUpdatedResponse, Session, UpdateProfileRequest,
    UpdateRoleRequest, User,
};

pub const AUTHORIZATION: &str = "Authorization";
const CONTENT_TYPE: &str = "Content-Type";

// =============================================================================
// REQUEST / RESPONSE
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// Transport-neutral outgoing request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), headers: Vec::new(), body: None }
    }

    /// Set a header, replacing any existing value (names compare case-insensitively).
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if `body` cannot be serialized.
    pub fn json<B: Serialize>(self, body: &B) -> Result<Self, serde_json::Error> {
        let raw = serde_json::to_string(body)?;
        let mut request = self.with_header(CONTENT_TYPE, "application/json");
        request.body = Some(raw);
        Ok(request)
    }
}

/// Return `request` carrying `Authorization: Bearer <token>`.
#[must_use]
pub fn attach_auth(request: HttpRequest, token: &str) -> HttpRequest {
    request.with_header(AUTHORIZATION, &format!("Bearer {token}"))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network-level failure (connection refused, DNS, aborted fetch).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// The HTTP stack underneath [`AuthClient`].
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthClientError {
    #[error("no token found")]
    NoCredential,
    #[error("request failed: {0}")]
    Transport(#[from] TransportError),
    #[error("server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl AuthClientError {
    /// The server-provided message, when the server sent one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }

    /// HTTP status of a rejection.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Typed client for the roster HTTP API rooted at `base_url` (e.g. `/api`).
#[derive(Clone, Debug)]
pub struct AuthClient<T> {
    base_url: String,
    transport: T,
}

impl<T: Transport> AuthClient<T> {
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { base_url, transport }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Validate the persisted token against `GET /users/me`.
    ///
    /// # Errors
    ///
    /// [`AuthClientError::NoCredential`] when no token is stored, otherwise
    /// whatever the request produced. Storage is left untouched either way.
    pub async fn load_current_user<S: DurableStorage>(&self, store: &TokenStore<S>) -> Result<Session, AuthClientError> {
        let token = store.token().ok_or(AuthClientError::NoCredential)?;
        let user = self.fetch_current_user(&token).await?;
        Ok(Session { user, token })
    }

    /// `GET /users/me` with an explicit token.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or a bad body.
    pub async fn fetch_current_user(&self, token: &str) -> Result<User, AuthClientError> {
        let request = attach_auth(HttpRequest::new(Method::Get, self.url("/users/me")), token);
        self.execute(request).await
    }

    /// `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthClientError::Rejected`] with status 401 on bad credentials.
    pub async fn login(&self, login: &str, password: &str) -> Result<Session, AuthClientError> {
        let body = LoginRequest { login: login.to_owned(), password: password.to_owned() };
        let request = HttpRequest::new(Method::Post, self.url("/auth/login")).json(&body)?;
        self.execute(request).await
    }

    /// `POST /auth/register`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthClientError::Rejected`] on validation failure or conflict.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<Session, AuthClientError> {
        let body = RegisterRequest { username: username.to_owned(), email: email.to_owned(), password: password.to_owned() };
        let request = HttpRequest::new(Method::Post, self.url("/auth/register")).json(&body)?;
        self.execute(request).await
    }

    /// `POST /auth/logout`, revoking `token` server-side.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-2xx status.
    pub async fn logout(&self, token: &str) -> Result<(), AuthClientError> {
        let request = attach_auth(HttpRequest::new(Method::Post, self.url("/auth/logout")), token);
        self.execute_empty(request).await
    }

    /// `PATCH /users/me`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or a bad body.
    pub async fn update_profile(&self, token: &str, changes: &UpdateProfileRequest) -> Result<User, AuthClientError> {
        let request = HttpRequest::new(Method::Patch, self.url("/users/me")).json(changes)?;
        self.execute(attach_auth(request, token)).await
    }

    /// `GET /admin/users`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or a bad body.
    pub async fn list_users(&self, token: &str) -> Result<Vec<User>, AuthClientError> {
        let request = attach_auth(HttpRequest::new(Method::Get, self.url("/admin/users")), token);
        self.execute(request).await
    }

    /// `DELETE /admin/users/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthClientError::Rejected`] with status 404 for unknown ids.
    pub async fn delete_user(&self, token: &str, id: &str) -> Result<MessageResponse, AuthClientError> {
        let request = attach_auth(HttpRequest::new(Method::Delete, self.url(&format!("/admin/users/{id}"))), token);
        self.execute(request).await
    }

    /// `PUT /admin/users/{id}/role`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthClientError::Rejected`] with status 400 or 404.
    pub async fn update_role(&self, token: &str, id: &str, role: &str) -> Result<RoleUpdatedResponse, AuthClientError> {
        let body = UpdateRoleRequest { role: role.to_owned() };
        let request = HttpRequest::new(Method::Put, self.url(&format!("/admin/users/{id}/role"))).json(&body)?;
        self.execute(attach_auth(request, token)).await
    }

    async fn send_checked(&self, request: HttpRequest) -> Result<HttpResponse, AuthClientError> {
        let response = self.transport.send(request).await?;
        if response.is_success() {
            return Ok(response);
        }
        let message = serde_json::from_str::<MessageResponse>(&response.body)
            .map(|m| m.message)
            .unwrap_or_default();
        Err(AuthClientError::Rejected { status: response.status, message })
    }

    async fn execute<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, AuthClientError> {
        let response = self.send_checked(request).await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    async fn execute_empty(&self, request: HttpRequest) -> Result<(), AuthClientError> {
        self.send_checked(request).await.map(|_| ())
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

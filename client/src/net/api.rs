//! REST transport for the browser.
//!
//! Client-side (csr): real HTTP calls via `gloo-net`.
//! Native builds: a stub transport that always fails, since these endpoints
//! are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Result` outputs instead of panics; pages turn failures into
//! `ErrorSet` transitions or inline messages.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use roster_session::{AuthClient, AuthClientError, HttpRequest, HttpResponse, Transport, TransportError};

/// Mount point of the JSON API on the serving origin.
pub const API_BASE: &str = "/api";

/// Fallback shown when a failed call carried no server message.
pub const REQUEST_FAILED_MESSAGE: &str = "Request failed";

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

impl Transport for BrowserTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        #[cfg(feature = "csr")]
        {
            use gloo_net::http::{Method as FetchMethod, RequestBuilder};
            use roster_session::Method;

            let method = match request.method {
                Method::Get => FetchMethod::GET,
                Method::Post => FetchMethod::POST,
                Method::Put => FetchMethod::PUT,
                Method::Patch => FetchMethod::PATCH,
                Method::Delete => FetchMethod::DELETE,
            };
            let mut builder = RequestBuilder::new(&request.url).method(method);
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            let built = match request.body {
                Some(body) => builder.body(body),
                None => builder.build(),
            }
            .map_err(|e| TransportError(e.to_string()))?;

            let response = built.send().await.map_err(|e| TransportError(e.to_string()))?;
            let status = response.status();
            let body = response.text().await.map_err(|e| TransportError(e.to_string()))?;
            Ok(HttpResponse { status, body })
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = request;
            Err(TransportError(unavailable_message()))
        }
    }
}

#[cfg(any(test, not(feature = "csr")))]
fn unavailable_message() -> String {
    "HTTP is only available in the browser".to_owned()
}

/// API client bound to [`API_BASE`] on the current origin.
#[must_use]
pub fn api_client() -> AuthClient<BrowserTransport> {
    AuthClient::new(API_BASE, BrowserTransport)
}

/// True when the server no longer accepts the bearer token.
#[must_use]
pub fn session_rejected(err: &AuthClientError) -> bool {
    err.status() == Some(401)
}

/// Message to show for a failed call: the server's `{message}` when present.
#[must_use]
pub fn error_message(err: &AuthClientError) -> String {
    err.server_message().unwrap_or(REQUEST_FAILED_MESSAGE).to_owned()
}

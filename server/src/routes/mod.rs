//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! All JSON endpoints live under `/api`. Admin routes authorize through the
//! `AdminUser` extractor, account routes through `AuthUser`. `/healthz` is
//! unauthenticated for load balancers.

pub mod admin;
pub mod auth;
pub mod error;
#[cfg(test)]
mod test_support;
pub mod users;

use axum::Router;
use axum::http::StatusCode;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/users/me", get(users::me).patch(users::update_me))
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/{id}", axum::routing::delete(admin::delete_user))
        .route("/api/admin/users/{id}/role", put(admin::update_user_role))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

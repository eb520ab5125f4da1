//! Auth routes: bearer extractors, registration, login, logout.

use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::Json;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use roster_session::Session;
use roster_session::types::{LoginRequest, RegisterRequest};

use super::error::{ApiError, ApiJson, SERVER_ERROR};
use crate::services::store::UserRecord;
use crate::services::{auth as auth_svc, session};
use crate::state::AppState;

// =============================================================================
// AUTH EXTRACTORS
// =============================================================================

/// Authenticated user resolved from an `Authorization: Bearer` header.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: UserRecord,
    pub token: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(authorization) = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Unauthorized("Authentication required"))?;
        let token = authorization.token().trim();

        let app_state = AppState::from_ref(state);
        let user = session::resolve(app_state.sessions.as_ref(), token)
            .await
            .map_err(|e| ApiError::server_fault(SERVER_ERROR, &e))?
            .ok_or(ApiError::Unauthorized("Invalid or expired token"))?;

        Ok(Self { user, token: token.to_owned() })
    }
}

/// Authenticated user holding the `admin` role.
pub struct AdminUser(pub UserRecord);

impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser { user, .. } = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.is_admin() {
            tracing::warn!(user_id = %user.id, "non-admin attempted admin route");
            return Err(ApiError::Forbidden("Admin access required"));
        }
        Ok(Self(user))
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/auth/register`: create a user account and sign it in.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Session>), ApiError> {
    let session = auth_svc::register(&state, body).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// `POST /api/auth/login`: exchange username-or-email and password for a token.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<Session>, ApiError> {
    Ok(Json(auth_svc::login(&state, body).await?))
}

/// `POST /api/auth/logout`: revoke the presented session.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> Result<StatusCode, ApiError> {
    session::revoke(state.sessions.as_ref(), &auth.token)
        .await
        .map_err(|e| ApiError::server_fault(SERVER_ERROR, &e))?;
    tracing::info!(user_id = %auth.user.id, "user logged out");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

//! Self-service profile routes.

use axum::extract::State;
use axum::response::Json;
use roster_session::User;
use roster_session::types::UpdateProfileRequest;

use super::auth::AuthUser;
use super::error::{ApiError, ApiJson, SERVER_ERROR, user_error};
use crate::services::users;
use crate::state::AppState;

/// `GET /api/users/me`: the profile behind the bearer token.
pub async fn me(auth: AuthUser) -> Json<User> {
    Json(auth.user.to_public())
}

/// `PATCH /api/users/me`: change username and/or email.
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    let user = users::update_profile(&state, auth.user.id, body)
        .await
        .map_err(|e| user_error(e, SERVER_ERROR))?;
    tracing::info!(user_id = %user.id, "profile updated");
    Ok(Json(user.to_public()))
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;

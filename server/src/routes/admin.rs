//! Admin user-management routes. Every handler takes [`AdminUser`], so
//! authentication and the role check run before the body.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::Json;
use roster_session::User;
use roster_session::types::{MessageResponse, RoleUpdatedResponse, UpdateRoleRequest};

use super::auth::AdminUser;
use super::error::{ApiError, SERVER_ERROR, user_error};
use crate::services::users;
use crate::state::AppState;

/// `GET /api/admin/users`: every user, without password hashes.
pub async fn list_users(State(state): State<AppState>, AdminUser(_admin): AdminUser) -> Result<Json<Vec<User>>, ApiError> {
    let records = users::list_users(&state)
        .await
        .map_err(|e| user_error(e, SERVER_ERROR))?;
    Ok(Json(records.iter().map(|u| u.to_public()).collect()))
}

/// `DELETE /api/admin/users/:id`: remove a user and its sessions.
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    users::delete_user(&state, &id)
        .await
        .map_err(|e| user_error(e, "Error deleting user"))?;
    tracing::info!(admin_id = %admin.id, target = %id, "admin deleted user");
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// Role named by a `PUT .../role` body. A missing or malformed body names no
/// role, so the id lookup still decides between 404 and 400.
fn requested_role(body: &[u8]) -> String {
    serde_json::from_slice::<UpdateRoleRequest>(body)
        .map(|req| req.role)
        .unwrap_or_default()
}

/// `PUT /api/admin/users/:id/role`: set a user's role to `user` or `admin`.
pub async fn update_user_role(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<RoleUpdatedResponse>, ApiError> {
    let user = users::update_role(&state, &id, &requested_role(&body))
        .await
        .map_err(|e| user_error(e, "Error updating user role"))?;
    tracing::info!(admin_id = %admin.id, target = %id, role = %user.role, "admin changed user role");
    Ok(Json(RoleUpdatedResponse { message: "User role updated successfully".to_owned(), user: user.to_public() }))
}

#[cfg(test)]
#[path = "admin_test.rs"]
mod tests;

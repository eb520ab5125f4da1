//! User administration and self-service profile changes.
//!
//! Raw path ids and role strings arrive unparsed. An id that is not a UUID
//! cannot match any record and is reported as [`UserError::NotFound`], the
//! same as a well-formed id with no row.

use roster_session::types::UpdateProfileRequest;
use roster_session::Role;
use roster_session::types::InvalidRole;
use uuid::Uuid;

use super::auth::{ValidationError, normalize_email, normalize_username};
use super::store::{ProfileChanges, StoreError, UserRecord};
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    InvalidRole(#[from] InvalidRole),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("{0} already in use")]
    Conflict(&'static str),
    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for UserError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(field) => Self::Conflict(field),
            other => Self::Store(other),
        }
    }
}

fn parse_id(raw: &str) -> Result<Uuid, UserError> {
    Uuid::parse_str(raw.trim()).map_err(|_| UserError::NotFound)
}

/// Every user record, oldest first.
///
/// # Errors
///
/// Returns a store error if the query fails.
pub async fn list_users(state: &AppState) -> Result<Vec<UserRecord>, UserError> {
    Ok(state.users.list().await?)
}

/// Delete a user and, by cascade, its sessions.
///
/// # Errors
///
/// Returns [`UserError::NotFound`] when no record matches `raw_id`.
pub async fn delete_user(state: &AppState, raw_id: &str) -> Result<(), UserError> {
    let id = parse_id(raw_id)?;
    if !state.users.delete(id).await? {
        return Err(UserError::NotFound);
    }
    tracing::info!(user_id = %id, "user deleted");
    Ok(())
}

/// Change a user's role.
///
/// Existence is checked before the role value, so an unknown id is reported
/// as not found whatever role was requested.
///
/// # Errors
///
/// Returns [`UserError::NotFound`], [`UserError::InvalidRole`] (record left
/// unchanged), or a store error.
pub async fn update_role(state: &AppState, raw_id: &str, raw_role: &str) -> Result<UserRecord, UserError> {
    let id = parse_id(raw_id)?;
    if state.users.find_by_id(id).await?.is_none() {
        return Err(UserError::NotFound);
    }
    let role: Role = raw_role.parse()?;
    let user = state.users.set_role(id, role).await?.ok_or(UserError::NotFound)?;
    tracing::info!(user_id = %id, role = %role, "user role updated");
    Ok(user)
}

/// Apply a partial profile change for the signed-in user.
///
/// # Errors
///
/// Returns [`UserError::Invalid`] for bad fields, [`UserError::Conflict`]
/// when the new username or email is taken, or [`UserError::NotFound`] if
/// the account vanished mid-request.
pub async fn update_profile(state: &AppState, id: Uuid, req: UpdateProfileRequest) -> Result<UserRecord, UserError> {
    let changes = ProfileChanges {
        username: req.username.as_deref().map(normalize_username).transpose()?,
        email: req.email.as_deref().map(normalize_email).transpose()?,
    };
    if changes.username.is_none() && changes.email.is_none() {
        return state.users.find_by_id(id).await?.ok_or(UserError::NotFound);
    }
    state.users.update_profile(id, changes).await?.ok_or(UserError::NotFound)
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;

//! Account service: registration, login, credential validation.
//!
//! Passwords are hashed with Argon2id. Field validators are shared with the
//! profile update path in `services::users`.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use roster_session::types::{LoginRequest, RegisterRequest};
use roster_session::{Role, Session};

use super::session;
use super::store::{NewUser, StoreError, UserRecord};
use crate::config::AdminBootstrap;
use crate::state::AppState;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 32;

/// A request field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("{0} already in use")]
    Conflict(&'static str),
    #[error("password hashing failed")]
    PasswordHash,
    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(field) => Self::Conflict(field),
            other => Self::Store(other),
        }
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Trimmed username of 3-32 ASCII letters, digits, `_`, `.` or `-`.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming the `username` field.
pub fn normalize_username(raw: &str) -> Result<String, ValidationError> {
    let username = raw.trim();
    if username.len() < MIN_USERNAME_LENGTH || username.len() > MAX_USERNAME_LENGTH {
        return Err(ValidationError { field: "username", reason: "must be 3 to 32 characters" });
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(ValidationError { field: "username", reason: "may only contain letters, digits, '_', '.' and '-'" });
    }
    Ok(username.to_owned())
}

/// Trimmed, lowercased `local@domain` address.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming the `email` field.
pub fn normalize_email(raw: &str) -> Result<String, ValidationError> {
    let invalid = ValidationError { field: "email", reason: "is not a valid address" };
    let email = raw.trim().to_ascii_lowercase();
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid);
    };
    if local.is_empty() || domain.is_empty() || email.chars().any(char::is_whitespace) {
        return Err(invalid);
    }
    Ok(email)
}

/// # Errors
///
/// Returns a [`ValidationError`] when the password is shorter than
/// [`MIN_PASSWORD_LENGTH`] characters.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError { field: "password", reason: "must be at least 8 characters" });
    }
    Ok(())
}

// =============================================================================
// PASSWORDS
// =============================================================================

/// Hash a password using Argon2id with a random salt.
///
/// # Errors
///
/// Returns [`AuthError::PasswordHash`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored PHC hash string.
///
/// # Errors
///
/// Returns [`AuthError::InvalidCredentials`] on mismatch or a malformed hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

// =============================================================================
// FLOWS
// =============================================================================

async fn start_session(state: &AppState, user: &UserRecord) -> Result<Session, AuthError> {
    let token = session::issue(state.sessions.as_ref(), user.id, state.session_ttl_hours).await?;
    Ok(Session { user: user.to_public(), token })
}

/// Create a `user`-role account and sign it in.
///
/// # Errors
///
/// Returns [`AuthError::Invalid`] for bad fields, [`AuthError::Conflict`] when
/// the username or email is taken, or a store error.
pub async fn register(state: &AppState, req: RegisterRequest) -> Result<Session, AuthError> {
    let username = normalize_username(&req.username)?;
    let email = normalize_email(&req.email)?;
    validate_password(&req.password)?;

    let password_hash = hash_password(&req.password)?;
    let user = state
        .users
        .insert(NewUser { username, email, role: Role::User, password_hash })
        .await?;
    tracing::info!(user_id = %user.id, username = %user.username, "user registered");
    start_session(state, &user).await
}

/// Exchange username-or-email plus password for a session.
///
/// Unknown logins and wrong passwords are indistinguishable to the caller.
///
/// # Errors
///
/// Returns [`AuthError::InvalidCredentials`] or a store error.
pub async fn login(state: &AppState, req: LoginRequest) -> Result<Session, AuthError> {
    let login = req.login.trim();
    if login.is_empty() || req.password.is_empty() {
        return Err(AuthError::InvalidCredentials);
    }
    let Some(user) = state.users.find_by_login(login).await? else {
        tracing::debug!(%login, "login for unknown user");
        return Err(AuthError::InvalidCredentials);
    };
    verify_password(&req.password, &user.password_hash)?;
    tracing::info!(user_id = %user.id, "user logged in");
    start_session(state, &user).await
}

/// Create the configured admin account unless the username already exists.
/// Returns whether an account was created.
///
/// # Errors
///
/// Returns an error if the configured fields are invalid or the store fails.
pub async fn seed_admin(state: &AppState, admin: &AdminBootstrap) -> Result<bool, AuthError> {
    let username = normalize_username(&admin.username)?;
    let email = normalize_email(&admin.email)?;
    validate_password(&admin.password)?;

    if state.users.find_by_login(&username).await?.is_some() {
        return Ok(false);
    }
    let password_hash = hash_password(&admin.password)?;
    let user = state
        .users
        .insert(NewUser { username, email, role: Role::Admin, password_hash })
        .await?;
    tracing::info!(user_id = %user.id, "bootstrap admin created");
    Ok(true)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

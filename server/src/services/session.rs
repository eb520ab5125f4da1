//! Bearer session issuance and validation.
//!
//! ARCHITECTURE
//! ============
//! Tokens are 32 random bytes rendered as hex and handed to the client once.
//! The session table only ever stores `sha256(token)`.

use std::fmt::Write;

use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::store::{SessionStore, StoreError, UserRecord};

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Hex SHA-256 of a bearer token, as stored in `sessions.token_hash`.
#[must_use]
pub fn hash_token(token: &str) -> String {
    bytes_to_hex(&Sha256::digest(token.as_bytes()))
}

/// Create a session for `user_id`, returning the raw token.
///
/// # Errors
///
/// Returns an error if the session row cannot be written.
pub async fn issue(sessions: &dyn SessionStore, user_id: Uuid, ttl_hours: i32) -> Result<String, StoreError> {
    let token = generate_token();
    sessions.create(&hash_token(&token), user_id, ttl_hours).await?;
    Ok(token)
}

/// Resolve a raw bearer token to its user, if the session is live.
///
/// # Errors
///
/// Returns an error if the session lookup fails.
pub async fn resolve(sessions: &dyn SessionStore, token: &str) -> Result<Option<UserRecord>, StoreError> {
    if token.is_empty() {
        return Ok(None);
    }
    sessions.resolve(&hash_token(token)).await
}

/// Delete the session for a raw bearer token.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub async fn revoke(sessions: &dyn SessionStore, token: &str) -> Result<(), StoreError> {
    sessions.revoke(&hash_token(token)).await
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::sync::{Arc, LazyLock};

use roster_session::Role;

use super::AppState;
use crate::services::auth::hash_password;
use crate::services::session;
use crate::services::store::{NewUser, UserRecord, UserStore};
use crate::services::store_memory::MemoryStore;

/// Password every seeded user can log in with.
pub const SEED_PASSWORD: &str = "password123";

pub const TEST_SESSION_TTL_HOURS: i32 = 1;

// Argon2 is slow in debug builds; hash the shared password once.
static SEED_PASSWORD_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password(SEED_PASSWORD).expect("hashing the seed password should not fail"));

/// `AppState` over a fresh in-memory store, plus a handle to that store.
#[must_use]
pub fn memory_state() -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), store.clone(), TEST_SESSION_TTL_HOURS);
    (state, store)
}

/// Insert `username` with email `{username}@example.com` and [`SEED_PASSWORD`].
pub async fn seed_user(users: &dyn UserStore, username: &str, role: Role) -> UserRecord {
    users
        .insert(NewUser {
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            role,
            password_hash: SEED_PASSWORD_HASH.clone(),
        })
        .await
        .expect("seed user insert should succeed")
}

/// Seed a user and open a session for it, returning the record and raw token.
pub async fn seed_session(state: &AppState, username: &str, role: Role) -> (UserRecord, String) {
    let user = seed_user(state.users.as_ref(), username, role).await;
    let token = session::issue(state.sessions.as_ref(), user.id, state.session_ttl_hours)
        .await
        .expect("session issue should succeed");
    (user, token)
}

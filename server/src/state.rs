//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the user and session stores behind trait objects so handlers
//! run unchanged against Postgres in production and an in-memory store in
//! tests.

use std::sync::Arc;

use sqlx::PgPool;

use crate::services::store::{PgStore, SessionStore, UserStore};

/// Shared application state, cloned into each handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    /// Lifetime of newly issued sessions.
    pub session_ttl_hours: i32,
}

impl AppState {
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>, sessions: Arc<dyn SessionStore>, session_ttl_hours: i32) -> Self {
        Self { users, sessions, session_ttl_hours }
    }

    /// State backed by a single [`PgStore`] for both users and sessions.
    #[must_use]
    pub fn postgres(pool: PgPool, session_ttl_hours: i32) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self::new(store.clone(), store, session_ttl_hours)
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
#[path = "state_helpers_test.rs"]
pub mod test_helpers;

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

//! Durable key-value storage and the token store built on top of it.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser backs [`DurableStorage`] with `localStorage`, the CLI with a
//! JSON file, and tests with [`MemoryStorage`]. Only two keys are ever
//! written: [`TOKEN_KEY`] holds the raw bearer token and [`USER_KEY`] the
//! JSON-serialized profile of the signed-in user.

use std::collections::HashMap;

use crate::types::User;

/// Storage key holding the raw bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the cached user profile as JSON.
pub const USER_KEY: &str = "user";

/// Synchronous string key-value store that survives process restarts.
///
/// Writes are best-effort: a backend that cannot persist (quota, missing
/// window) drops the write, matching browser `localStorage` semantics.
pub trait DurableStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-process storage used by tests and non-browser builds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

// =============================================================================
// TOKEN STORE
// =============================================================================

/// Typed view over a [`DurableStorage`] for the session credential.
///
/// The token store only persists; attaching the token to outgoing requests
/// is done per call by [`crate::client::attach_auth`].
#[derive(Clone, Debug, Default)]
pub struct TokenStore<S> {
    storage: S,
}

impl<S: DurableStorage> TokenStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Persisted bearer token. An empty entry counts as absent.
    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Cached user profile. Unparseable JSON counts as absent.
    pub fn user(&self) -> Option<User> {
        let raw = self.storage.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                log::warn!("discarding unreadable cached user: {e}");
                None
            }
        }
    }

    /// Persist `Some(token)` or remove the stored token on `None`.
    pub fn set_credential(&mut self, token: Option<&str>) {
        match token {
            Some(token) => self.storage.set(TOKEN_KEY, token),
            None => self.storage.remove(TOKEN_KEY),
        }
    }

    pub fn persist_user(&mut self, user: &User) {
        match serde_json::to_string(user) {
            Ok(raw) => self.storage.set(USER_KEY, &raw),
            Err(e) => log::warn!("failed to serialize user for storage: {e}"),
        }
    }

    /// Remove both the token and the cached profile.
    pub fn clear(&mut self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;

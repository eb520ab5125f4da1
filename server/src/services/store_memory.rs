//! In-memory [`UserStore`]/[`SessionStore`] double used by tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use roster_session::Role;
use uuid::Uuid;

use super::store::{NewUser, ProfileChanges, SessionStore, StoreError, UserRecord, UserStore};

#[derive(Default)]
struct Inner {
    users: Vec<UserRecord>,
    sessions: HashMap<String, (Uuid, Instant)>,
}

/// Mirrors the Postgres semantics: unique username/email, cascading
/// session removal, expiring sessions. `set_failing(true)` makes every call
/// return a database error; `set_users_failing(true)` does so only for
/// [`UserStore`] calls, leaving session lookups working.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    failing: AtomicBool,
    users_failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_users_failing(&self, failing: bool) {
        self.users_failing.store(failing, Ordering::SeqCst);
    }

    /// Force every existing session past its expiry.
    pub fn expire_all_sessions(&self) {
        let now = Instant::now();
        for (_, expires_at) in self.lock().sessions.values_mut() {
            *expires_at = now;
        }
    }

    pub fn session_count(&self) -> usize {
        self.lock().sessions.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store poisoned")
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn check_users(&self) -> Result<(), StoreError> {
        if self.users_failing.load(Ordering::SeqCst) {
            return Err(StoreError::Db(sqlx::Error::PoolTimedOut));
        }
        self.check()
    }
}

fn conflict(users: &[UserRecord], skip: Option<Uuid>, username: Option<&str>, email: Option<&str>) -> Option<StoreError> {
    let others = users.iter().filter(|u| Some(u.id) != skip);
    for user in others {
        if username.is_some_and(|name| user.username == name) {
            return Some(StoreError::Conflict("username"));
        }
        if email.is_some_and(|mail| user.email == mail) {
            return Some(StoreError::Conflict("email"));
        }
    }
    None
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
        self.check_users()?;
        Ok(self.lock().users.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        self.check_users()?;
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<UserRecord>, StoreError> {
        self.check_users()?;
        let email = login.to_lowercase();
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.username == login || u.email == email)
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        self.check_users()?;
        let mut inner = self.lock();
        if let Some(err) = conflict(&inner.users, None, Some(&user.username), Some(&user.email)) {
            return Err(err);
        }
        let record = UserRecord {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            role: user.role,
            password_hash: user.password_hash,
        };
        inner.users.push(record.clone());
        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.check_users()?;
        let mut inner = self.lock();
        let before = inner.users.len();
        inner.users.retain(|u| u.id != id);
        inner.sessions.retain(|_, (user_id, _)| *user_id != id);
        Ok(inner.users.len() != before)
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<Option<UserRecord>, StoreError> {
        self.check_users()?;
        let mut inner = self.lock();
        Ok(inner.users.iter_mut().find(|u| u.id == id).map(|u| {
            u.role = role;
            u.clone()
        }))
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<Option<UserRecord>, StoreError> {
        self.check_users()?;
        let mut inner = self.lock();
        if let Some(err) = conflict(&inner.users, Some(id), changes.username.as_deref(), changes.email.as_deref()) {
            return Err(err);
        }
        Ok(inner.users.iter_mut().find(|u| u.id == id).map(|u| {
            if let Some(username) = changes.username {
                u.username = username;
            }
            if let Some(email) = changes.email {
                u.email = email;
            }
            u.clone()
        }))
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create(&self, token_hash: &str, user_id: Uuid, ttl_hours: i32) -> Result<(), StoreError> {
        self.check()?;
        let ttl = Duration::from_secs(u64::from(ttl_hours.unsigned_abs()) * 3600);
        self.lock()
            .sessions
            .insert(token_hash.to_owned(), (user_id, Instant::now() + ttl));
        Ok(())
    }

    async fn resolve(&self, token_hash: &str) -> Result<Option<UserRecord>, StoreError> {
        self.check()?;
        let inner = self.lock();
        let Some((user_id, expires_at)) = inner.sessions.get(token_hash) else {
            return Ok(None);
        };
        if *expires_at <= Instant::now() {
            return Ok(None);
        }
        Ok(inner.users.iter().find(|u| u.id == *user_id).cloned())
    }

    async fn revoke(&self, token_hash: &str) -> Result<(), StoreError> {
        self.check()?;
        self.lock().sessions.remove(token_hash);
        Ok(())
    }
}

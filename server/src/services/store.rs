//! Persistence seam for users and sessions.
//!
//! ARCHITECTURE
//! ============
//! Handlers and services only see the [`UserStore`] and [`SessionStore`]
//! traits held in `AppState`. [`PgStore`] implements both over the SQLx pool;
//! tests swap in an in-memory double.
//!
//! [`UserRecord`] is the only type that carries a password hash and it is
//! not `Serialize`. Anything leaving the server goes through
//! [`UserRecord::to_public`].

use async_trait::async_trait;
use roster_session::{Role, User};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

// =============================================================================
// RECORDS
// =============================================================================

/// Stored user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
}

impl UserRecord {
    /// Client-facing profile without the password hash.
    #[must_use]
    pub fn to_public(&self) -> User {
        User { id: self.id.to_string(), username: self.username.clone(), email: self.email.clone(), role: self.role }
    }
}

/// Fields required to create a user. Values are already validated.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
}

/// Partial profile change. `None` leaves the column as is.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique column (`"username"` or `"email"`) already holds the value.
    #[error("{0} already in use")]
    Conflict(&'static str),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

// =============================================================================
// TRAITS
// =============================================================================

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> Result<Vec<UserRecord>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    /// Look up by exact username or by email.
    async fn find_by_login(&self, login: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError>;

    /// Remove a user and its sessions. `false` if no row matched.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn set_role(&self, id: Uuid, role: Role) -> Result<Option<UserRecord>, StoreError>;

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<Option<UserRecord>, StoreError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, token_hash: &str, user_id: Uuid, ttl_hours: i32) -> Result<(), StoreError>;

    /// User owning an unexpired session with this token hash.
    async fn resolve(&self, token_hash: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn revoke(&self, token_hash: &str) -> Result<(), StoreError>;
}

// =============================================================================
// POSTGRES
// =============================================================================

const USER_COLUMNS: &str = "id, username, email, role, password_hash";

/// `PostgreSQL` implementation of both stores.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> Result<UserRecord, sqlx::Error> {
    let raw_role: String = row.try_get("role")?;
    let role = raw_role.parse().unwrap_or_else(|_| {
        tracing::warn!(role = %raw_role, "unknown role in users table, treating as user");
        Role::User
    });
    Ok(UserRecord {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        role,
        password_hash: row.try_get("password_hash")?,
    })
}

/// Map unique-index violations onto [`StoreError::Conflict`].
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return match db.constraint() {
                Some("users_email_key") => StoreError::Conflict("email"),
                _ => StoreError::Conflict("username"),
            };
        }
    }
    StoreError::Db(err)
}

#[async_trait]
impl UserStore for PgStore {
    async fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, username"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(user_from_row).collect::<Result<Vec<_>, sqlx::Error>>()?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 OR email = lower($1) LIMIT 1"
        ))
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let row = sqlx::query(&format!(
            "INSERT INTO users (id, username, email, role, password_hash)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;
        Ok(user_from_row(&row)?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE users SET role = $2, updated_at = now() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE users
             SET username = COALESCE($2, username),
                 email = COALESCE($3, email),
                 updated_at = now()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.username)
        .bind(changes.email)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?;
        Ok(row.as_ref().map(user_from_row).transpose()?)
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn create(&self, token_hash: &str, user_id: Uuid, ttl_hours: i32) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO sessions (token_hash, user_id, expires_at)
             VALUES ($1, $2, now() + make_interval(hours => $3))",
        )
        .bind(token_hash)
        .bind(user_id)
        .bind(ttl_hours)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn resolve(&self, token_hash: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT u.id, u.username, u.email, u.role, u.password_hash
             FROM sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.token_hash = $1 AND s.expires_at > now()",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn revoke(&self, token_hash: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

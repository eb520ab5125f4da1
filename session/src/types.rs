//! Wire types shared by the server, the SPA and the CLI.
//!
//! Every HTTP body in the roster API has an explicit struct here. The server
//! validates them at the boundary; clients decode them with `serde_json`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// ROLE
// =============================================================================

/// Permission level of a user account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account.
    #[default]
    User,
    /// Elevated account allowed to use the admin API.
    Admin,
}

impl Role {
    /// Wire/storage spelling of the role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    #[must_use]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known role names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid role: {0}")]
pub struct InvalidRole(pub String);

impl FromStr for Role {
    type Err = InvalidRole;

    /// Role names are matched exactly; `"Admin"` is not a role.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(InvalidRole(other.to_owned())),
        }
    }
}

// =============================================================================
// USER PROFILE
// =============================================================================

/// Public user profile. Never carries credential material.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

/// A validated identity paired with the bearer token that proves it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

/// `POST /api/auth/login`. `login` is a username or an email address.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// `POST /api/auth/register`.
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// `PATCH /api/users/me`. Absent fields are left unchanged.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// `PUT /api/admin/users/{id}/role`.
///
/// `role` stays a raw string so an unknown or missing role is reported by the
/// handler, after the target id has been checked. A JSON value that is not a
/// string decodes as the empty string, which no role matches.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateRoleRequest {
    #[serde(default, deserialize_with = "any_json_as_role")]
    pub role: String,
}

fn any_json_as_role<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(role) => Ok(role),
        _ => Ok(String::new()),
    }
}

// =============================================================================
// RESPONSE BODIES
// =============================================================================

/// Body of every error response and of plain confirmations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Successful role change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleUpdatedResponse {
    pub message: String,
    pub user: User,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

//! User entity representing a registered account on the CraftSite backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role assigned to a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full access to the management endpoints
    Admin,
    /// Content-editing access only
    Editor,
}

impl UserRole {
    /// Role name as it appears inside token claims
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Editor => "editor",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User entity as stored by the external user store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Login name, unique across the store
    pub username: String,

    /// Bcrypt hash of the user's password
    pub password_hash: String,

    /// Role of the user
    pub role: UserRole,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new User instance
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: password_hash.into(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks if the user holds the admin role
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Hash-free projection of this user for API responses
    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }
}

/// Public projection of a user.
///
/// This type has no password-hash field at all, so a hash can never leak
/// into a serialized response by accident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Login name
    pub username: String,

    /// Role of the user
    pub role: UserRole,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

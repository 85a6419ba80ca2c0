//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims structure for JWT payload
///
/// Both token kinds carry the same claim set; they differ only in the
/// signing secret and the lifetime used at issue time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Role of the subject at issue time
    pub role: String,

    /// Unique token identifier. Timestamps are second-granular, so two
    /// tokens minted in the same second would otherwise be byte-identical
    /// and rotation could hand back the token it was meant to replace.
    pub jti: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,
}

impl Claims {
    /// Creates new claims expiring `ttl_seconds` from now
    pub fn new(user_id: Uuid, role: impl Into<String>, ttl_seconds: i64) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::seconds(ttl_seconds);

        Self {
            sub: user_id.to_string(),
            role: role.into(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Persisted refresh-token record
///
/// The sole durable piece of session state. At most one record may exist
/// per user at any point after a completed login or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// User this token belongs to
    pub user_id: Uuid,

    /// The refresh token string as handed to the client
    pub token: String,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// Creates a new refresh token record
    pub fn new(user_id: Uuid, token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            token: token.into(),
            created_at: Utc::now(),
            expires_at,
        }
    }

    /// Checks if the record has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,
}

impl TokenPair {
    /// Creates a new token pair
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
        }
    }
}

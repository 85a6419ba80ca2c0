//! Authentication and authorization configuration

use serde::{Deserialize, Serialize};

/// JWT authentication configuration
///
/// Access and refresh tokens are signed with different secrets so that one
/// kind can never be replayed as the other.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Secret key for signing access tokens
    pub access_secret: String,

    /// Secret key for signing refresh tokens
    pub refresh_secret: String,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            access_secret: String::from("default_access_secret"),
            refresh_secret: String::from("default_refresh_secret"),
            // Current deployment ships a 15 second access lifetime
            access_token_expiry: 15,
            refresh_token_expiry: 604800, // 7 days
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with explicit secrets
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in seconds
    pub fn with_access_expiry_seconds(mut self, seconds: i64) -> Self {
        self.access_token_expiry = seconds;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check if using default secrets (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.access_secret == "default_access_secret"
            || self.refresh_secret == "default_refresh_secret"
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let access_secret = std::env::var("JWT_ACCESS_SECRET")
            .unwrap_or_else(|_| "default_access_secret".to_string());
        let refresh_secret = std::env::var("JWT_REFRESH_SECRET")
            .unwrap_or_else(|_| "default_refresh_secret".to_string());
        let access_token_expiry = std::env::var("ACCESS_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .unwrap_or(15);
        let refresh_token_expiry = std::env::var("REFRESH_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "604800".to_string())
            .parse()
            .unwrap_or(604800);

        Self {
            jwt: JwtConfig {
                access_secret,
                refresh_secret,
                access_token_expiry,
                refresh_token_expiry,
            },
        }
    }
}

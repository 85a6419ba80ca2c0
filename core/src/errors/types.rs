//! Error type definitions for authentication and token management.
//!
//! Client-facing wording and HTTP status codes live in the presentation
//! layer; these variants only name the failure.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication token is missing")]
    MissingToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Failed to store rotated refresh token")]
    RefreshRotationFailed,
}

/// Token-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

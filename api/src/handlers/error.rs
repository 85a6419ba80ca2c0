//! Maps domain errors to HTTP responses.
//!
//! Every error leaves through here so the status mapping and the response
//! envelope stay in one place. Infrastructure failures are logged with
//! their detail and answered with a generic message.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use validator::ValidationErrors;

use cs_core::errors::{AuthError, DomainError, TokenError};
use cs_shared::ApiResponse;

pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let (status, message) = match error {
        DomainError::Auth(auth_error) => match auth_error {
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid username or password".to_string(),
            ),
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
            ),
            AuthError::UserNotFound => (StatusCode::NOT_FOUND, "User not found".to_string()),
            AuthError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Insufficient permissions".to_string(),
            ),
            AuthError::RefreshRotationFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Session could not be refreshed, please log in again".to_string(),
            ),
        },
        DomainError::Token(token_error) => match token_error {
            TokenError::TokenExpired => {
                (StatusCode::UNAUTHORIZED, "Token has expired".to_string())
            }
            TokenError::TokenRevoked => {
                (StatusCode::UNAUTHORIZED, "Token has been revoked".to_string())
            }
            TokenError::InvalidRefreshToken => {
                (StatusCode::UNAUTHORIZED, "Invalid refresh token".to_string())
            }
            TokenError::InvalidTokenFormat | TokenError::InvalidSignature => {
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
            }
            TokenError::TokenGenerationFailed => {
                log::error!("token generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        },
        DomainError::Validation { message } => (StatusCode::BAD_REQUEST, message.clone()),
        DomainError::NotFound { resource } => {
            (StatusCode::NOT_FOUND, format!("{resource} not found"))
        }
        DomainError::Database { .. } | DomainError::Internal { .. } => {
            log::error!("internal error while handling request: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred".to_string(),
            )
        }
    };

    HttpResponse::build(status).json(ApiResponse::<()>::error(message))
}

/// Turns request-body validation failures into a 400 envelope
pub fn handle_validation_errors(errors: &ValidationErrors) -> HttpResponse {
    let mut parts: Vec<String> = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        let details: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        parts.push(format!("{field}: {}", details.join(", ")));
    }
    // HashMap iteration order is arbitrary
    parts.sort();

    HttpResponse::BadRequest().json(ApiResponse::<()>::error(parts.join("; ")))
}

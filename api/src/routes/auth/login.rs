use actix_web::{web, HttpResponse};
use std::sync::Arc;
use validator::Validate;

use crate::dto::auth::{LoginRequest, LoginResponse};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};

use cs_core::repositories::{TokenRepository, UserRepository};
use cs_core::services::{AuthService, TokenBlacklist};
use cs_shared::ApiResponse;

/// Application state that holds shared services
pub struct AppState<U, T, B>
where
    U: UserRepository,
    T: TokenRepository,
    B: TokenBlacklist,
{
    pub auth_service: Arc<AuthService<U, T, B>>,
}

/// Handler for POST /api/auth/login
///
/// Authenticates a user by username and password and starts a session.
///
/// # Request Body
///
/// ```json
/// {
///     "username": "admin",
///     "password": "secret"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "message": "Login successful",
///     "data": {
///         "user": { "id": "...", "username": "admin", "role": "admin", ... },
///         "accessToken": "eyJ...",
///         "refreshToken": "eyJ..."
///     }
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Missing or malformed fields
/// - 401 Unauthorized: Unknown username or wrong password
pub async fn login<U, T, B>(
    state: web::Data<AppState<U, T, B>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    B: TokenBlacklist + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors);
    }

    match state
        .auth_service
        .login(&request.username, &request.password)
        .await
    {
        Ok(outcome) => {
            let response = LoginResponse {
                user: outcome.user,
                access_token: outcome.tokens.access_token,
                refresh_token: outcome.tokens.refresh_token,
            };
            HttpResponse::Ok().json(ApiResponse::success("Login successful", response))
        }
        Err(error) => handle_domain_error(&error),
    }
}

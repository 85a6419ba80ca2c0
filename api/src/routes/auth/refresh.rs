use actix_web::{web, HttpResponse};

use crate::dto::auth::RefreshTokenRequest;
use crate::handlers::error::handle_domain_error;

use cs_core::repositories::{TokenRepository, UserRepository};
use cs_core::services::TokenBlacklist;
use cs_shared::ApiResponse;

use super::AppState;

/// Handler for POST /api/auth/refresh-token
///
/// Exchanges a valid refresh token for a new access/refresh pair. The
/// presented token is consumed; only the returned pair stays usable.
///
/// # Request Body
///
/// ```json
/// {
///     "refreshToken": "eyJ..."
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "message": "Token refreshed",
///     "data": {
///         "accessToken": "eyJ...",
///         "refreshToken": "eyJ..."
///     }
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Unknown, expired, or already-rotated refresh token
/// - 404 Not Found: Token subject no longer exists
/// - 500 Internal Server Error: Rotation could not be persisted
pub async fn refresh_token<U, T, B>(
    state: web::Data<AppState<U, T, B>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    B: TokenBlacklist + 'static,
{
    match state.auth_service.refresh(&request.refresh_token).await {
        Ok(pair) => HttpResponse::Ok().json(ApiResponse::success("Token refreshed", pair)),
        Err(error) => handle_domain_error(&error),
    }
}

use actix_web::{web, HttpRequest, HttpResponse};

use crate::dto::auth::LogoutRequest;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::{bearer_token, AuthContext};

use cs_core::repositories::{TokenRepository, UserRepository};
use cs_core::services::TokenBlacklist;
use cs_shared::ApiResponse;

use super::AppState;

/// Handler for POST /api/auth/logout
///
/// Ends the caller's session: deletes the refresh-token record and revokes
/// the access token used to make the call. Requires authentication via
/// Bearer token in the Authorization header.
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
///     "message": "Logged out successfully",
///     "data": null
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing or invalid access token, or unknown refresh token
/// - 403 Forbidden: Refresh token belongs to another user
pub async fn logout<U, T, B>(
    req: HttpRequest,
    state: web::Data<AppState<U, T, B>>,
    auth: AuthContext,
    request: web::Json<LogoutRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    B: TokenBlacklist + 'static,
{
    // The gate already verified this token; it goes into the revocation
    // registry so it dies with the session.
    let access_token = bearer_token(req.headers());

    match state
        .auth_service
        .logout(&request.refresh_token, auth.user_id, access_token.as_deref())
        .await
    {
        Ok(()) => {
            HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Logged out successfully"))
        }
        Err(error) => handle_domain_error(&error),
    }
}

//! Route registration

use actix_web::error::InternalError;
use actix_web::{web, HttpResponse};

use cs_core::repositories::{TokenRepository, UserRepository};
use cs_core::services::TokenBlacklist;
use cs_shared::ApiResponse;

use crate::middleware::auth::JwtAuth;

pub mod auth;

pub use auth::AppState;

/// Registers all API routes.
///
/// Login and refresh are open; logout sits behind the authentication gate
/// because only the session owner may end it.
pub fn configure<U, T, B>(cfg: &mut web::ServiceConfig)
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    B: TokenBlacklist + 'static,
{
    // Malformed or incomplete JSON bodies must answer with the envelope,
    // not the extractor's plain-text default.
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let message = format!("Invalid request body: {err}");
        let response = HttpResponse::BadRequest().json(ApiResponse::<()>::error(message));
        InternalError::from_response(err, response).into()
    }));

    cfg.service(
        web::scope("/api/auth")
            .route("/login", web::post().to(auth::login::login::<U, T, B>))
            .route(
                "/refresh-token",
                web::post().to(auth::refresh::refresh_token::<U, T, B>),
            )
            .service(
                web::resource("/logout")
                    .wrap(JwtAuth)
                    .route(web::post().to(auth::logout::logout::<U, T, B>)),
            ),
    );
}

//! JWT authentication middleware for protecting API endpoints.
//!
//! The middleware extracts the bearer token from the Authorization header,
//! runs it through the authentication gate (revocation check first, then
//! signature and expiry), and injects an [`AuthContext`] into the request.
//! Rejections answer with the standard response envelope rather than a
//! plain-text 401.

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;
use uuid::Uuid;

use cs_core::domain::entities::token::Claims;
use cs_core::errors::{AuthError, DomainError, TokenError};
use cs_core::repositories::{TokenRepository, UserRepository};
use cs_core::services::{AuthService, TokenBlacklist};

use crate::handlers::error::handle_domain_error;

/// User authentication context injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User ID extracted from the verified claims
    pub user_id: Uuid,
    /// Role name as carried in the claims
    pub role: String,
}

impl AuthContext {
    /// Creates an authentication context from verified claims
    pub fn from_claims(claims: &Claims) -> Result<Self, DomainError> {
        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidTokenFormat))?;
        Ok(Self {
            user_id,
            role: claims.role.clone(),
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Trait object seam between the middleware and the auth service.
///
/// The service is generic over its stores; a trait object keyed on the one
/// method the middleware needs keeps those type parameters out of app data.
pub trait AuthenticateRequest: Send + Sync {
    fn authenticate(&self, access_token: &str) -> Result<Claims, DomainError>;
}

impl<U, T, B> AuthenticateRequest for AuthService<U, T, B>
where
    U: UserRepository,
    T: TokenRepository,
    B: TokenBlacklist,
{
    fn authenticate(&self, access_token: &str) -> Result<Claims, DomainError> {
        AuthService::authenticate(self, access_token)
    }
}

/// JWT authentication middleware factory
pub struct JwtAuth;

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = match bearer_token(req.headers()) {
                Some(token) => token,
                None => {
                    return Ok(reject(req, &DomainError::Auth(AuthError::MissingToken)));
                }
            };

            let gate = match req.app_data::<web::Data<Arc<dyn AuthenticateRequest>>>() {
                Some(gate) => Arc::clone(gate.get_ref()),
                None => {
                    log::error!("authentication gate missing from app data");
                    return Ok(reject(
                        req,
                        &DomainError::Internal {
                            message: "authentication not configured".to_string(),
                        },
                    ));
                }
            };

            let context = match gate
                .authenticate(&token)
                .and_then(|claims| AuthContext::from_claims(&claims))
            {
                Ok(context) => context,
                Err(error) => return Ok(reject(req, &error)),
            };

            req.extensions_mut().insert(context);

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

fn reject<B>(req: ServiceRequest, error: &DomainError) -> ServiceResponse<EitherBody<B>> {
    let response = handle_domain_error(error).map_into_right_body();
    req.into_response(response)
}

/// Extracts the bearer token from an Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req.extensions().get::<AuthContext>().cloned().ok_or_else(|| {
            let response = handle_domain_error(&DomainError::Auth(AuthError::MissingToken));
            actix_web::error::InternalError::from_response("authentication required", response)
                .into()
        });

        ready(result)
    }
}

/// Extractor that additionally requires the admin role
pub struct AdminUser(pub AuthContext);

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = match req.extensions().get::<AuthContext>().cloned() {
            Some(context) if context.is_admin() => Ok(AdminUser(context)),
            Some(_) => {
                let response = handle_domain_error(&DomainError::Auth(AuthError::Forbidden));
                Err(
                    actix_web::error::InternalError::from_response("admin role required", response)
                        .into(),
                )
            }
            None => {
                let response = handle_domain_error(&DomainError::Auth(AuthError::MissingToken));
                Err(actix_web::error::InternalError::from_response(
                    "authentication required",
                    response,
                )
                .into())
            }
        };

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        use actix_web::test;

        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer test_token_123"))
            .to_srv_request();
        assert_eq!(
            bearer_token(req.headers()),
            Some("test_token_123".to_string())
        );

        let req_no_bearer = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "test_token_123"))
            .to_srv_request();
        assert_eq!(bearer_token(req_no_bearer.headers()), None);

        let req_no_header = test::TestRequest::default().to_srv_request();
        assert_eq!(bearer_token(req_no_header.headers()), None);
    }

    #[test]
    fn test_is_admin() {
        let admin = AuthContext {
            user_id: Uuid::new_v4(),
            role: "admin".to_string(),
        };
        let editor = AuthContext {
            user_id: Uuid::new_v4(),
            role: "editor".to_string(),
        };

        assert!(admin.is_admin());
        assert!(!editor.is_admin());
    }
}

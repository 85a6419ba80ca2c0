//! HTTP middleware

pub mod auth;
pub mod cors;

pub use auth::{AdminUser, AuthContext, AuthenticateRequest, JwtAuth};

//! Request and response DTOs for the HTTP layer

pub mod auth;

pub use auth::{LoginRequest, LoginResponse, LogoutRequest, RefreshTokenRequest};

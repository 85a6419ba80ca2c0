//! Token service module for JWT management
//!
//! This module handles issuing and verifying the two token kinds:
//! - Access tokens: short-lived, verified on every protected request
//! - Refresh tokens: long-lived, exchanged for a new pair on rotation
//!
//! Each kind is signed with its own secret; verification against the
//! wrong kind's secret always fails.

mod config;
mod service;

pub use config::TokenServiceConfig;
pub use service::TokenService;

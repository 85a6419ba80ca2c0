//! Authentication service module
//!
//! This module provides the session lifecycle:
//! - Login with username and password
//! - Refresh-token rotation
//! - Logout with access-token revocation
//! - The authenticate gate used by protected endpoints

mod service;

#[cfg(test)]
mod tests;

pub use service::{AuthService, LoginOutcome};

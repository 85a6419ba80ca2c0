//! Business services containing domain logic and use cases.

pub mod auth;
pub mod password;
pub mod revocation;
pub mod token;

// Re-export commonly used types
pub use auth::AuthService;
pub use revocation::{InMemoryTokenBlacklist, TokenBlacklist};
pub use token::{TokenService, TokenServiceConfig};

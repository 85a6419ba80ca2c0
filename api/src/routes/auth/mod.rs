//! Authentication route handlers
//!
//! - Login with username and password
//! - Refresh-token rotation
//! - Logout

pub mod login;
pub mod logout;
pub mod refresh;

pub use login::AppState;

//! Repository interfaces for the external stores this subsystem relies on.
//!
//! The relational store itself is an external collaborator; these traits
//! define the contract and the `memory` modules provide process-local
//! implementations for development and tests.

pub mod token;
pub mod user;

pub use token::{InMemoryTokenRepository, TokenRepository};
pub use user::{InMemoryUserRepository, UserRepository};

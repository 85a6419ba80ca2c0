//! User repository trait defining the interface for user lookups.
//!
//! The user store is owned by the wider application; this subsystem only
//! ever reads from it.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity lookup operations
///
/// Implementations handle the actual store access while keeping the
/// abstraction boundary between domain and infrastructure layers.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their login name
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with the given username
    /// * `Err(DomainError)` - Store error occurred
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by their unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with the given id
    /// * `Err(DomainError)` - Store error occurred
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;
}

//! Token repository trait defining the interface for refresh token persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

/// Repository trait for refresh-token record persistence
///
/// The session manager keeps at most one record per user; login and refresh
/// both call `delete_all_for_user` before `create` to uphold that.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Persist a new refresh-token record
    ///
    /// # Returns
    /// * `Ok(RefreshTokenRecord)` - The saved record
    /// * `Err(DomainError)` - Save failed (e.g., duplicate token string)
    async fn create(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError>;

    /// Find a record by the exact token string handed to the client
    ///
    /// # Returns
    /// * `Ok(Some(RefreshTokenRecord))` - Record found
    /// * `Ok(None)` - No record with the given token string
    /// * `Err(DomainError)` - Store error occurred
    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// Delete every record belonging to a user
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records deleted
    /// * `Err(DomainError)` - Deletion failed
    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError>;

    /// Delete the record matching the given token string
    ///
    /// # Returns
    /// * `Ok(true)` - Record was deleted
    /// * `Ok(false)` - No matching record
    /// * `Err(DomainError)` - Deletion failed
    async fn delete_by_token(&self, token: &str) -> Result<bool, DomainError>;
}

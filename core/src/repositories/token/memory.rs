//! In-memory implementation of TokenRepository.
//!
//! Stands in for the external refresh-token store in development builds
//! and tests. Records are keyed by the token string, mirroring the unique
//! constraint the relational store puts on that column.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

use super::r#trait::TokenRepository;

/// In-memory refresh-token repository
pub struct InMemoryTokenRepository {
    records: Arc<RwLock<HashMap<String, RefreshTokenRecord>>>,
}

impl InMemoryTokenRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Count records belonging to a user (test/observability helper)
    pub async fn count_for_user(&self, user_id: Uuid) -> usize {
        let records = self.records.read().await;
        records.values().filter(|r| r.user_id == user_id).count()
    }
}

impl Default for InMemoryTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn create(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError> {
        let mut records = self.records.write().await;

        // Token strings are unique, same as the relational schema
        if records.contains_key(&record.token) {
            return Err(DomainError::Database {
                message: "refresh token already exists".to_string(),
            });
        }

        records.insert(record.token.clone(), record.clone());
        Ok(record)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(token).cloned())
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let mut records = self.records.write().await;
        let initial_count = records.len();

        records.retain(|_, record| record.user_id != user_id);

        Ok(initial_count - records.len())
    }

    async fn delete_by_token(&self, token: &str) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        Ok(records.remove(token).is_some())
    }
}

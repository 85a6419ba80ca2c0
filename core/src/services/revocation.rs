//! Token revocation registry.
//!
//! Verification of a JWT is stateless; revocation is the stateful patch on
//! top of it. The registry holds tokens that must be rejected before their
//! natural expiry (logged-out access tokens, orphaned refresh tokens).
//!
//! The in-memory implementation is best-effort: it does not survive a
//! process restart and does not replicate across instances. The trait seam
//! exists so a shared external store can be swapped in for multi-instance
//! deployments.

use chrono::{DateTime, Utc};
use std::sync::RwLock;

/// Injectable revocation registry
pub trait TokenBlacklist: Send + Sync {
    /// Add a token to the registry
    ///
    /// `expires_at` bounds how long the entry has to be kept; once the
    /// token would have expired on its own there is no need to track it.
    /// Duplicate adds are harmless.
    fn add(&self, token: &str, expires_at: DateTime<Utc>);

    /// Check whether a token is revoked, by exact string match
    fn contains(&self, token: &str) -> bool;
}

/// A single revoked-token entry
#[derive(Debug, Clone)]
struct BlacklistedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Process-local revocation registry
pub struct InMemoryTokenBlacklist {
    entries: RwLock<Vec<BlacklistedToken>>,
}

impl InMemoryTokenBlacklist {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Number of live entries (test/observability helper)
    pub fn len(&self) -> usize {
        self.entries.read().expect("blacklist lock poisoned").len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryTokenBlacklist {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenBlacklist for InMemoryTokenBlacklist {
    fn add(&self, token: &str, expires_at: DateTime<Utc>) {
        let mut entries = self.entries.write().expect("blacklist lock poisoned");

        // Purge expired entries first so the working set stays bounded by
        // tokens that are still legitimately alive.
        let now = Utc::now();
        entries.retain(|entry| entry.expires_at > now);

        entries.push(BlacklistedToken {
            token: token.to_string(),
            expires_at,
        });

        tracing::debug!(entries = entries.len(), "token added to revocation registry");
    }

    fn contains(&self, token: &str) -> bool {
        let entries = self.entries.read().expect("blacklist lock poisoned");
        entries.iter().any(|entry| entry.token == token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_add_and_contains() {
        let blacklist = InMemoryTokenBlacklist::new();
        blacklist.add("revoked-token", Utc::now() + Duration::days(1));

        assert!(blacklist.contains("revoked-token"));
        assert!(!blacklist.contains("other-token"));
    }

    #[test]
    fn test_duplicate_adds_are_harmless() {
        let blacklist = InMemoryTokenBlacklist::new();
        let expires_at = Utc::now() + Duration::days(1);

        blacklist.add("tok", expires_at);
        blacklist.add("tok", expires_at);

        assert!(blacklist.contains("tok"));
        assert_eq!(blacklist.len(), 2);
    }

    #[test]
    fn test_insert_purges_expired_entries() {
        let blacklist = InMemoryTokenBlacklist::new();

        for i in 0..5 {
            blacklist.add(&format!("stale-{i}"), Utc::now() - Duration::seconds(1));
        }
        // This insert sweeps everything that is already past expiry
        blacklist.add("fresh", Utc::now() + Duration::days(1));

        for i in 0..5 {
            assert!(!blacklist.contains(&format!("stale-{i}")));
        }
        assert!(blacklist.contains("fresh"));
        assert_eq!(blacklist.len(), 1);
    }

    #[test]
    fn test_entry_survives_until_expiry() {
        let blacklist = InMemoryTokenBlacklist::new();
        blacklist.add("long-lived", Utc::now() + Duration::days(1));
        blacklist.add("trigger-cleanup", Utc::now() + Duration::days(1));

        assert!(blacklist.contains("long-lived"));
    }
}

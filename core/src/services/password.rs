//! Password hashing and verification.
//!
//! Wraps bcrypt with the cost the rest of the application expects.
//! Neither function ever logs the plaintext or the stored hash.

use crate::errors::DomainError;

/// Bcrypt cost factor used for new hashes
pub const HASH_COST: u32 = 10;

/// Hash a plaintext password
pub fn hash_password(plain: &str) -> Result<String, DomainError> {
    bcrypt::hash(plain, HASH_COST).map_err(|_| DomainError::Internal {
        message: "password hashing failed".to_string(),
    })
}

/// Compare a plaintext password against a stored bcrypt hash
///
/// Returns `false` on mismatch; bcrypt performs the comparison in
/// constant time over the derived key.
pub fn verify_password(plain: &str, stored_hash: &str) -> Result<bool, DomainError> {
    bcrypt::verify(plain, stored_hash).map_err(|_| DomainError::Internal {
        message: "password verification failed".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("admin123").unwrap();

        assert_ne!(hash, "admin123");
        assert!(verify_password("admin123", &hash).unwrap());
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("admin123").unwrap();
        assert!(!verify_password("letmein", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("admin123", "not-a-bcrypt-hash").is_err());
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("admin123").unwrap();
        let second = hash_password("admin123").unwrap();
        assert_ne!(first, second);
    }
}

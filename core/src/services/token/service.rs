//! Main token service implementation

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::domain::entities::token::Claims;
use crate::errors::{DomainError, TokenError};

use super::config::TokenServiceConfig;

/// The two token kinds handled by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Access,
    Refresh,
}

/// Service for issuing and verifying JWTs
///
/// Stateless by design: verification checks only signature and expiry.
/// Revocation is a separate layer (see `services::revocation`) so each
/// can be tested independently.
pub struct TokenService {
    config: TokenServiceConfig,
    access_encoding_key: EncodingKey,
    access_decoding_key: DecodingKey,
    refresh_encoding_key: EncodingKey,
    refresh_decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a new token service instance
    pub fn new(config: TokenServiceConfig) -> Self {
        let access_encoding_key = EncodingKey::from_secret(config.access_secret.as_bytes());
        let access_decoding_key = DecodingKey::from_secret(config.access_secret.as_bytes());
        let refresh_encoding_key = EncodingKey::from_secret(config.refresh_secret.as_bytes());
        let refresh_decoding_key = DecodingKey::from_secret(config.refresh_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Access tokens can live for seconds; the default 60s leeway would
        // keep them valid past their whole lifetime.
        validation.leeway = 0;

        Self {
            config,
            access_encoding_key,
            access_decoding_key,
            refresh_encoding_key,
            refresh_decoding_key,
            validation,
        }
    }

    /// Issues an access token for a user
    pub fn issue_access_token(&self, user_id: Uuid, role: &str) -> Result<String, DomainError> {
        let claims = Claims::new(user_id, role, self.config.access_token_ttl_seconds);
        self.encode_jwt(&claims, TokenKind::Access)
    }

    /// Issues a refresh token for a user
    pub fn issue_refresh_token(&self, user_id: Uuid, role: &str) -> Result<String, DomainError> {
        let claims = Claims::new(user_id, role, self.config.refresh_token_ttl_seconds);
        self.encode_jwt(&claims, TokenKind::Refresh)
    }

    /// Verifies an access token and returns the claims
    ///
    /// Fails if the signature is invalid, the payload is malformed, or the
    /// token has expired. A refresh token presented here fails the
    /// signature check because the secrets differ.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        self.decode_jwt(token, TokenKind::Access)
    }

    /// Verifies a refresh token and returns the claims
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, DomainError> {
        self.decode_jwt(token, TokenKind::Refresh)
    }

    /// Access token lifetime as a chrono duration
    pub fn access_token_ttl(&self) -> Duration {
        Duration::seconds(self.config.access_token_ttl_seconds)
    }

    /// Refresh token lifetime as a chrono duration
    pub fn refresh_token_ttl(&self) -> Duration {
        Duration::seconds(self.config.refresh_token_ttl_seconds)
    }

    fn encode_jwt(&self, claims: &Claims, kind: TokenKind) -> Result<String, DomainError> {
        let key = match kind {
            TokenKind::Access => &self.access_encoding_key,
            TokenKind::Refresh => &self.refresh_encoding_key,
        };
        encode(&Header::new(Algorithm::HS256), claims, key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    fn decode_jwt(&self, token: &str, kind: TokenKind) -> Result<Claims, DomainError> {
        let key = match kind {
            TokenKind::Access => &self.access_decoding_key,
            TokenKind::Refresh => &self.refresh_decoding_key,
        };
        let token_data = decode::<Claims>(token, key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    DomainError::Token(TokenError::TokenExpired)
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    DomainError::Token(TokenError::InvalidSignature)
                }
                _ => DomainError::Token(TokenError::InvalidTokenFormat),
            }
        })?;

        Ok(token_data.claims)
    }
}

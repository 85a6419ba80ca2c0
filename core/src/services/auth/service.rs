//! Main authentication service implementation

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::{Claims, RefreshTokenRecord, TokenPair};
use crate::domain::entities::user::UserProfile;
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{TokenRepository, UserRepository};
use crate::services::password::verify_password;
use crate::services::revocation::TokenBlacklist;
use crate::services::token::TokenService;

/// How long a logged-out access token stays in the revocation registry.
/// Approximates the token's natural lifetime so the entry is purgeable.
const LOGOUT_BLACKLIST_DAYS: i64 = 1;

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// The authenticated user, without any credential material
    pub user: UserProfile,
    /// Freshly minted access and refresh tokens
    pub tokens: TokenPair,
}

/// Authentication service managing the session lifecycle
///
/// Orchestrates the credential check, the token codec, the revocation
/// registry, and the persisted single-refresh-token-per-user record.
pub struct AuthService<U, T, B>
where
    U: UserRepository,
    T: TokenRepository,
    B: TokenBlacklist,
{
    /// User store, read-only to this subsystem
    user_repository: Arc<U>,
    /// Refresh-token record store
    token_repository: Arc<T>,
    /// Revocation registry for tokens that must die early
    blacklist: Arc<B>,
    /// JWT codec
    token_service: Arc<TokenService>,
}

impl<U, T, B> AuthService<U, T, B>
where
    U: UserRepository,
    T: TokenRepository,
    B: TokenBlacklist,
{
    /// Create a new authentication service
    pub fn new(
        user_repository: Arc<U>,
        token_repository: Arc<T>,
        blacklist: Arc<B>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            user_repository,
            token_repository,
            blacklist,
            token_service,
        }
    }

    /// Authenticate a user by username and password
    ///
    /// This method:
    /// 1. Looks up the user by username
    /// 2. Verifies the password against the stored hash
    /// 3. Mints an access/refresh token pair
    /// 4. Rotates the persisted refresh-token record (delete all, create one)
    ///
    /// Absent user and wrong password both map to `InvalidCredentials`, so
    /// the response does not reveal which usernames exist.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<LoginOutcome> {
        let user = self
            .user_repository
            .find_by_username(username)
            .await?
            .ok_or(DomainError::Auth(AuthError::InvalidCredentials))?;

        if !verify_password(password, &user.password_hash)? {
            tracing::warn!(username, "login failed: password mismatch");
            return Err(DomainError::Auth(AuthError::InvalidCredentials));
        }

        let role = user.role.as_str();
        let access_token = self.token_service.issue_access_token(user.id, role)?;
        let refresh_token = self.token_service.issue_refresh_token(user.id, role)?;

        // Keep at most one active record per user. The delete and the
        // create are two separate store calls; the window in between is
        // accepted, not locked away (see DESIGN.md).
        let expires_at = Utc::now() + self.token_service.refresh_token_ttl();
        self.token_repository.delete_all_for_user(user.id).await?;
        self.token_repository
            .create(RefreshTokenRecord::new(user.id, refresh_token.clone(), expires_at))
            .await?;

        tracing::info!(user_id = %user.id, "user logged in");

        Ok(LoginOutcome {
            user: user.profile(),
            tokens: TokenPair::new(access_token, refresh_token),
        })
    }

    /// Exchange a refresh token for a new access/refresh pair
    ///
    /// The presented token must have a live persisted record; a token that
    /// was already rotated away is rejected here even though its signature
    /// is still valid. On success the old record is replaced by the new
    /// one. If the new record cannot be stored the old token is pushed
    /// into the revocation registry and the caller must log in again
    /// rather than being left with an ambiguous session.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        let record = self
            .token_repository
            .find_by_token(refresh_token)
            .await?
            .ok_or(DomainError::Token(TokenError::InvalidRefreshToken))?;

        if record.is_expired() {
            return Err(DomainError::Token(TokenError::TokenExpired));
        }

        let claims = self.token_service.verify_refresh_token(refresh_token)?;
        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidTokenFormat))?;

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Auth(AuthError::UserNotFound))?;

        let role = user.role.as_str();
        let access_token = self.token_service.issue_access_token(user.id, role)?;
        let new_refresh_token = self.token_service.issue_refresh_token(user.id, role)?;

        // Delete every record for the user first; a stale duplicate from a
        // prior partial failure would otherwise collide with the create.
        let expires_at = Utc::now() + self.token_service.refresh_token_ttl();
        self.token_repository.delete_all_for_user(user.id).await?;

        let new_record = RefreshTokenRecord::new(user.id, new_refresh_token.clone(), expires_at);
        if let Err(error) = self.token_repository.create(new_record).await {
            // Fail closed: the presented token no longer has a record, so
            // make sure it cannot be replayed, then force a re-login.
            tracing::error!(user_id = %user.id, %error, "refresh rotation failed to persist");
            self.blacklist.add(refresh_token, expires_at);
            return Err(DomainError::Auth(AuthError::RefreshRotationFailed));
        }

        tracing::debug!(user_id = %user.id, "refresh token rotated");

        Ok(TokenPair::new(access_token, new_refresh_token))
    }

    /// End the session owning `refresh_token`
    ///
    /// Only the session owner may end it; `caller_id` comes from the
    /// caller's verified access token. When that access token is supplied
    /// it is revoked immediately instead of riding out its expiry.
    pub async fn logout(
        &self,
        refresh_token: &str,
        caller_id: Uuid,
        access_token: Option<&str>,
    ) -> DomainResult<()> {
        let record = self
            .token_repository
            .find_by_token(refresh_token)
            .await?
            .ok_or(DomainError::Token(TokenError::InvalidRefreshToken))?;

        if record.user_id != caller_id {
            tracing::warn!(
                caller_id = %caller_id,
                owner_id = %record.user_id,
                "logout rejected: refresh token owned by another user"
            );
            return Err(DomainError::Auth(AuthError::Forbidden));
        }

        if let Some(token) = access_token {
            self.blacklist
                .add(token, Utc::now() + Duration::days(LOGOUT_BLACKLIST_DAYS));
        }

        self.token_repository.delete_by_token(refresh_token).await?;

        tracing::info!(user_id = %caller_id, "user logged out");

        Ok(())
    }

    /// Gate for protected requests
    ///
    /// Two explicit layers: the revocation check first, then stateless
    /// signature/expiry verification.
    pub fn authenticate(&self, access_token: &str) -> DomainResult<Claims> {
        if self.blacklist.contains(access_token) {
            return Err(DomainError::Token(TokenError::TokenRevoked));
        }

        self.token_service.verify_access_token(access_token)
    }
}

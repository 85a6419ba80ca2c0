//! Session lifecycle tests against in-memory collaborators

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::domain::entities::user::{User, UserRole};
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::{InMemoryTokenRepository, InMemoryUserRepository, TokenRepository};
use crate::services::auth::AuthService;
use crate::services::password::hash_password;
use crate::services::revocation::{InMemoryTokenBlacklist, TokenBlacklist};
use crate::services::token::{TokenService, TokenServiceConfig};

/// Token repository that can be told to fail its next create call
struct FlakyTokenRepository {
    inner: InMemoryTokenRepository,
    fail_create: AtomicBool,
}

impl FlakyTokenRepository {
    fn new() -> Self {
        Self {
            inner: InMemoryTokenRepository::new(),
            fail_create: AtomicBool::new(false),
        }
    }

    fn fail_next_create(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    async fn count_for_user(&self, user_id: Uuid) -> usize {
        self.inner.count_for_user(user_id).await
    }
}

#[async_trait]
impl TokenRepository for FlakyTokenRepository {
    async fn create(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError> {
        if self.fail_create.swap(false, Ordering::SeqCst) {
            return Err(DomainError::Database {
                message: "simulated write failure".to_string(),
            });
        }
        self.inner.create(record).await
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>, DomainError> {
        self.inner.find_by_token(token).await
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        self.inner.delete_all_for_user(user_id).await
    }

    async fn delete_by_token(&self, token: &str) -> Result<bool, DomainError> {
        self.inner.delete_by_token(token).await
    }
}

struct Fixture {
    service: AuthService<InMemoryUserRepository, FlakyTokenRepository, InMemoryTokenBlacklist>,
    tokens: Arc<FlakyTokenRepository>,
    blacklist: Arc<InMemoryTokenBlacklist>,
    token_service: Arc<TokenService>,
    admin: User,
    editor: User,
}

fn token_config() -> TokenServiceConfig {
    TokenServiceConfig {
        access_secret: "test_access_secret".to_string(),
        refresh_secret: "test_refresh_secret".to_string(),
        access_token_ttl_seconds: 60,
        refresh_token_ttl_seconds: 604800,
    }
}

async fn fixture() -> Fixture {
    let users = Arc::new(InMemoryUserRepository::new());
    let tokens = Arc::new(FlakyTokenRepository::new());
    let blacklist = Arc::new(InMemoryTokenBlacklist::new());
    let token_service = Arc::new(TokenService::new(token_config()));

    let admin = User::new("admin", hash_password("admin123").unwrap(), UserRole::Admin);
    let editor = User::new("editor", hash_password("editor123").unwrap(), UserRole::Editor);
    users.insert(admin.clone()).await;
    users.insert(editor.clone()).await;

    let service = AuthService::new(
        users,
        Arc::clone(&tokens),
        Arc::clone(&blacklist),
        Arc::clone(&token_service),
    );

    Fixture {
        service,
        tokens,
        blacklist,
        token_service,
        admin,
        editor,
    }
}

#[tokio::test]
async fn login_returns_matching_claims_and_profile() {
    let fx = fixture().await;

    let outcome = fx.service.login("admin", "admin123").await.unwrap();

    assert_eq!(outcome.user.id, fx.admin.id);
    assert_eq!(outcome.user.username, "admin");

    let access_claims = fx
        .token_service
        .verify_access_token(&outcome.tokens.access_token)
        .unwrap();
    assert_eq!(access_claims.user_id().unwrap(), fx.admin.id);
    assert_eq!(access_claims.role, "admin");

    let refresh_claims = fx
        .token_service
        .verify_refresh_token(&outcome.tokens.refresh_token)
        .unwrap();
    assert_eq!(refresh_claims.user_id().unwrap(), fx.admin.id);
}

#[tokio::test]
async fn login_with_wrong_password_fails() {
    let fx = fixture().await;

    let result = fx.service.login("admin", "wrong").await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::InvalidCredentials))
    ));
    assert_eq!(fx.tokens.count_for_user(fx.admin.id).await, 0);
}

#[tokio::test]
async fn login_with_unknown_user_fails_identically() {
    let fx = fixture().await;

    let result = fx.service.login("ghost", "admin123").await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::InvalidCredentials))
    ));
}

#[tokio::test]
async fn repeated_logins_keep_a_single_record() {
    let fx = fixture().await;

    fx.service.login("admin", "admin123").await.unwrap();
    fx.service.login("admin", "admin123").await.unwrap();
    fx.service.login("admin", "admin123").await.unwrap();

    assert_eq!(fx.tokens.count_for_user(fx.admin.id).await, 1);
}

#[tokio::test]
async fn refresh_rotates_the_persisted_record() {
    let fx = fixture().await;

    let outcome = fx.service.login("admin", "admin123").await.unwrap();
    let old_refresh = outcome.tokens.refresh_token;

    let pair = fx.service.refresh(&old_refresh).await.unwrap();

    assert_ne!(pair.refresh_token, old_refresh);
    assert_eq!(fx.tokens.count_for_user(fx.admin.id).await, 1);
    assert!(fx.tokens.find_by_token(&old_refresh).await.unwrap().is_none());
    assert!(fx
        .tokens
        .find_by_token(&pair.refresh_token)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn rotation_in_the_same_second_still_mints_a_new_token() {
    let fx = fixture().await;

    let outcome = fx.service.login("admin", "admin123").await.unwrap();
    // Immediate refresh: iat/exp are second-granular and identical here,
    // so only the jti claim separates the pairs.
    let pair = fx.service.refresh(&outcome.tokens.refresh_token).await.unwrap();

    assert_ne!(pair.refresh_token, outcome.tokens.refresh_token);
    assert_ne!(pair.access_token, outcome.tokens.access_token);
}

#[tokio::test]
async fn rotated_away_token_cannot_refresh_again() {
    let fx = fixture().await;

    let outcome = fx.service.login("admin", "admin123").await.unwrap();
    let old_refresh = outcome.tokens.refresh_token;
    fx.service.refresh(&old_refresh).await.unwrap();

    // The old string is still cryptographically valid; only the missing
    // record rejects it.
    let result = fx.service.refresh(&old_refresh).await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidRefreshToken))
    ));
}

#[tokio::test]
async fn refresh_with_expired_record_fails() {
    let fx = fixture().await;

    let token = fx
        .token_service
        .issue_refresh_token(fx.admin.id, "admin")
        .unwrap();
    fx.tokens
        .create(RefreshTokenRecord::new(
            fx.admin.id,
            token.clone(),
            Utc::now() - Duration::hours(1),
        ))
        .await
        .unwrap();

    let result = fx.service.refresh(&token).await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::TokenExpired))
    ));
}

#[tokio::test]
async fn refresh_for_deleted_user_fails() {
    let fx = fixture().await;

    // Record exists but the subject no longer does
    let orphan_id = Uuid::new_v4();
    let token = fx
        .token_service
        .issue_refresh_token(orphan_id, "editor")
        .unwrap();
    fx.tokens
        .create(RefreshTokenRecord::new(
            orphan_id,
            token.clone(),
            Utc::now() + Duration::days(7),
        ))
        .await
        .unwrap();

    let result = fx.service.refresh(&token).await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::UserNotFound))
    ));
}

#[tokio::test]
async fn refresh_persist_failure_revokes_the_presented_token() {
    let fx = fixture().await;

    let outcome = fx.service.login("admin", "admin123").await.unwrap();
    let old_refresh = outcome.tokens.refresh_token;

    fx.tokens.fail_next_create();
    let result = fx.service.refresh(&old_refresh).await;

    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::RefreshRotationFailed))
    ));
    assert!(fx.blacklist.contains(&old_refresh));
    // Fail closed: the user has no usable session left
    assert_eq!(fx.tokens.count_for_user(fx.admin.id).await, 0);
}

#[tokio::test]
async fn logout_deletes_record_and_revokes_access_token() {
    let fx = fixture().await;

    let outcome = fx.service.login("admin", "admin123").await.unwrap();
    let access = outcome.tokens.access_token;
    let refresh = outcome.tokens.refresh_token;

    fx.service
        .logout(&refresh, fx.admin.id, Some(&access))
        .await
        .unwrap();

    assert!(fx.tokens.find_by_token(&refresh).await.unwrap().is_none());
    assert!(matches!(
        fx.service.authenticate(&access),
        Err(DomainError::Token(TokenError::TokenRevoked))
    ));
}

#[tokio::test]
async fn logout_without_access_token_still_deletes_record() {
    let fx = fixture().await;

    let outcome = fx.service.login("admin", "admin123").await.unwrap();
    let refresh = outcome.tokens.refresh_token;

    fx.service.logout(&refresh, fx.admin.id, None).await.unwrap();

    assert!(fx.tokens.find_by_token(&refresh).await.unwrap().is_none());
    assert!(fx.blacklist.is_empty());
}

#[tokio::test]
async fn logout_with_someone_elses_token_is_forbidden() {
    let fx = fixture().await;

    let admin_session = fx.service.login("admin", "admin123").await.unwrap();

    let result = fx
        .service
        .logout(&admin_session.tokens.refresh_token, fx.editor.id, None)
        .await;

    assert!(matches!(result, Err(DomainError::Auth(AuthError::Forbidden))));
    // The session must survive the rejected attempt
    assert_eq!(fx.tokens.count_for_user(fx.admin.id).await, 1);
}

#[tokio::test]
async fn logout_with_unknown_token_fails() {
    let fx = fixture().await;

    let result = fx.service.logout("no-such-token", fx.admin.id, None).await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidRefreshToken))
    ));
}

#[tokio::test]
async fn authenticate_accepts_a_fresh_access_token() {
    let fx = fixture().await;

    let outcome = fx.service.login("editor", "editor123").await.unwrap();
    let claims = fx.service.authenticate(&outcome.tokens.access_token).unwrap();

    assert_eq!(claims.user_id().unwrap(), fx.editor.id);
    assert_eq!(claims.role, "editor");
}

#[tokio::test]
async fn authenticate_rejects_refresh_tokens() {
    let fx = fixture().await;

    let outcome = fx.service.login("admin", "admin123").await.unwrap();
    let result = fx.service.authenticate(&outcome.tokens.refresh_token);

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidSignature))
    ));
}

#[tokio::test]
async fn authenticate_rejects_expired_access_tokens() {
    let fx = fixture().await;

    // Signed with the same secret but already past expiry
    let expired_minter = TokenService::new(TokenServiceConfig {
        access_token_ttl_seconds: -10,
        ..token_config()
    });
    let stale = expired_minter
        .issue_access_token(fx.admin.id, "admin")
        .unwrap();

    assert!(matches!(
        fx.service.authenticate(&stale),
        Err(DomainError::Token(TokenError::TokenExpired))
    ));
}

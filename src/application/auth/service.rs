//! The authentication service.
//!
//! Identity reads are cached under three keys at once (email, username,
//! id) so any later lookup axis hits. Token validation caches only
//! positive outcomes, keyed by the SHA-256 digest of the raw token so the
//! token itself never appears in a cache key.

use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};

use crate::application::cache_keys;
use crate::application::dto::{user_to_dto, UserDto};
use crate::domain::foundation::DomainError;
use crate::domain::identity::{User, UserDraft};
use crate::ports::{
    CacheService, CacheServiceExt, PasswordHasher, TokenService, UnitOfWork, UnitOfWorkFactory,
};

use super::{AuthError, AuthSuccess, LoginRequest, RegisterRequest};

const USER_CACHE_TTL: Duration = Duration::from_secs(15 * 60);
const TOKEN_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const TOKEN_VALIDATION_TTL: Duration = Duration::from_secs(60 * 60);

pub struct AuthService {
    factory: Arc<dyn UnitOfWorkFactory>,
    cache: Arc<dyn CacheService>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        factory: Arc<dyn UnitOfWorkFactory>,
        cache: Arc<dyn CacheService>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            factory,
            cache,
            hasher,
            tokens,
        }
    }

    /// Authenticates by email or username and issues a token.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthSuccess, AuthError> {
        let identifier = request.identifier.trim();
        let by_email = identifier.contains('@');
        let cache_key = if by_email {
            cache_keys::user_by_email(identifier)
        } else {
            cache_keys::user_by_username(identifier)
        };

        let user = match self.cache.get_json::<User>(&cache_key).await {
            Some(user) => user,
            None => {
                let uow = self.factory.create();
                let found = if by_email {
                    uow.users().find_active_by_email(identifier).await
                } else {
                    uow.users().find_active_by_username(identifier).await
                }
                .map_err(internal("Login failed"))?;
                let Some(user) = found else {
                    return Err(AuthError::InvalidCredentials);
                };
                self.cache_user(&user).await;
                user
            }
        };

        // A cached account may have been deactivated since it was stored.
        if !user.is_active {
            return Err(AuthError::InvalidCredentials);
        }
        if !self.hasher.verify(&request.password, &user.password_hash).await {
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_and_cache(&user).await
    }

    /// Creates an account and logs it straight in.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthSuccess, AuthError> {
        let uow = self.factory.create();

        // Cheap duplicate probe via the cache before touching the store.
        let cached_dup = self
            .cache
            .exists(&cache_keys::user_by_email(&request.email))
            .await
            || self
                .cache
                .exists(&cache_keys::user_by_username(&request.username))
                .await;
        if cached_dup {
            return Err(AuthError::DuplicateIdentity);
        }
        if uow
            .users()
            .find_by_email_or_username(&request.email, &request.username)
            .await
            .map_err(internal("Registration failed"))?
            .is_some()
        {
            return Err(AuthError::DuplicateIdentity);
        }

        let password_hash = self
            .hasher
            .hash(&request.password)
            .await
            .map_err(internal("Registration failed"))?;
        let draft = UserDraft {
            username: request.username,
            email: request.email,
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
            is_active: true,
        };

        uow.begin_transaction()
            .await
            .map_err(internal("Registration failed"))?;
        let persisted = async {
            let user = uow.users().insert(&draft).await?;
            uow.save_changes().await?;
            Ok::<User, DomainError>(user)
        }
        .await;
        let user = match persisted {
            Ok(user) => {
                uow.commit_transaction()
                    .await
                    .map_err(internal("Registration failed"))?;
                user
            }
            Err(e) => {
                if let Err(rb) = uow.rollback_transaction().await {
                    tracing::error!(error = %rb, "rollback failed");
                }
                // The store's unique constraint is the last word on races.
                return match e.code {
                    crate::domain::foundation::ErrorCode::DuplicateKey => {
                        Err(AuthError::DuplicateIdentity)
                    }
                    _ => Err(AuthError::Internal(format!("Registration failed: {}", e))),
                };
            }
        };

        self.cache_user(&user).await;
        self.issue_and_cache(&user).await
    }

    /// Checks a raw token. Only genuine tokens are ever cached, so a cache
    /// hit is always a pass.
    pub async fn validate_token(&self, token: &str) -> bool {
        let key = cache_keys::valid_token(&token_digest(token));
        if self.cache.exists(&key).await {
            return true;
        }
        if self.tokens.verify(token).await.is_err() {
            return false;
        }
        self.cache
            .set_raw(&key, "1".to_string(), Some(TOKEN_VALIDATION_TTL))
            .await;
        true
    }

    /// Resolves the account behind a token, if the token is valid and the
    /// account still active.
    pub async fn current_user(&self, token: &str) -> Option<UserDto> {
        let claims = self.tokens.verify(token).await.ok()?;
        let key = cache_keys::user_by_id(&claims.user_id);
        if let Some(user) = self.cache.get_json::<User>(&key).await {
            return user.is_active.then(|| user_to_dto(&user));
        }
        let uow = self.factory.create();
        let user = match uow.users().find_by_id(&claims.user_id).await {
            Ok(Some(user)) if user.is_active && !user.audit.is_deleted => user,
            Ok(_) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "current-user lookup failed");
                return None;
            }
        };
        self.cache_user(&user).await;
        Some(user_to_dto(&user))
    }

    /// Drops the server-side token record and its validation entry.
    pub async fn logout(&self, token: &str) {
        if let Ok(claims) = self.tokens.verify(token).await {
            self.cache
                .remove(&cache_keys::token_for_user(&claims.user_id))
                .await;
        }
        self.cache
            .remove(&cache_keys::valid_token(&token_digest(token)))
            .await;
    }

    /// Evicts every cache entry that can serve this user.
    pub async fn invalidate_user_cache(&self, user: &User) {
        let email_key = cache_keys::user_by_email(&user.email);
        let username_key = cache_keys::user_by_username(&user.username);
        let id_key = cache_keys::user_by_id(&user.id);
        let token_key = cache_keys::token_for_user(&user.id);
        futures::join!(
            self.cache.remove(&email_key),
            self.cache.remove(&username_key),
            self.cache.remove(&id_key),
            self.cache.remove(&token_key),
        );
    }

    /// Populates all three identity keys so any lookup axis hits.
    async fn cache_user(&self, user: &User) {
        let email_key = cache_keys::user_by_email(&user.email);
        let username_key = cache_keys::user_by_username(&user.username);
        let id_key = cache_keys::user_by_id(&user.id);
        futures::join!(
            self.cache.set_json(&email_key, user, Some(USER_CACHE_TTL)),
            self.cache.set_json(&username_key, user, Some(USER_CACHE_TTL)),
            self.cache.set_json(&id_key, user, Some(USER_CACHE_TTL)),
        );
    }

    async fn issue_and_cache(&self, user: &User) -> Result<AuthSuccess, AuthError> {
        let token = self
            .tokens
            .issue(&user.id, &user.email, &user.username)
            .await
            .map_err(internal("Login failed"))?;
        self.cache
            .set_raw(
                &cache_keys::token_for_user(&user.id),
                token.clone(),
                Some(TOKEN_CACHE_TTL),
            )
            .await;
        Ok(AuthSuccess {
            token,
            user: user_to_dto(user),
        })
    }
}

fn token_digest(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

fn internal(context: &'static str) -> impl Fn(DomainError) -> AuthError {
    move |e| AuthError::Internal(format!("{}: {}", context, e))
}

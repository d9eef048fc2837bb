//! Authentication end to end: registration, login, token lifecycle.

use std::sync::Arc;
use std::time::Duration;

use catalog_api::adapters::auth::{Argon2PasswordHasher, JwtTokenService};
use catalog_api::adapters::cache::InMemoryCacheService;
use catalog_api::adapters::memory::{InMemoryStore, InMemoryUnitOfWorkFactory};
use catalog_api::application::auth::{AuthService, LoginRequest, RegisterRequest};
use catalog_api::application::cache_keys;
use catalog_api::config::AuthConfig;
use catalog_api::ports::CacheService;

fn auth_with(cache: Arc<InMemoryCacheService>, store: Arc<InMemoryStore>) -> AuthService {
    let config = AuthConfig {
        jwt_secret: "an-integration-secret-of-decent-length".to_string(),
        ..Default::default()
    };
    AuthService::new(
        Arc::new(InMemoryUnitOfWorkFactory::new(store)),
        cache,
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(JwtTokenService::new(&config)),
    )
}

fn registration() -> RegisterRequest {
    RegisterRequest {
        username: "ada".to_string(),
        email: "ada@example.com".to_string(),
        password: "correct-horse-battery".to_string(),
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
    }
}

#[tokio::test]
async fn identity_cache_entries_carry_the_expected_ttls() {
    let cache = Arc::new(InMemoryCacheService::new());
    let store = InMemoryStore::new();
    let auth = auth_with(cache.clone(), store);

    let registered = auth.register(registration()).await.unwrap();

    let user_ttl = cache
        .expiration(&cache_keys::user_by_email("ada@example.com"))
        .await
        .expect("identity keys should expire");
    assert!(user_ttl <= Duration::from_secs(15 * 60));
    assert!(user_ttl > Duration::from_secs(14 * 60));

    let token_ttl = cache
        .expiration(&cache_keys::token_for_user(&registered.user.id))
        .await
        .expect("token key should expire");
    assert!(token_ttl <= Duration::from_secs(24 * 60 * 60));
    assert!(token_ttl > Duration::from_secs(23 * 60 * 60));
}

#[tokio::test]
async fn the_whole_journey_holds_together() {
    let cache = Arc::new(InMemoryCacheService::new());
    let store = InMemoryStore::new();
    let auth = auth_with(cache.clone(), store);

    let registered = auth.register(registration()).await.unwrap();
    assert_eq!(registered.user.email, "ada@example.com");
    // The DTO exposes no secrets; the serialized form must not either.
    let serialized = serde_json::to_string(&registered.user).unwrap();
    assert!(!serialized.contains("password"));

    assert!(auth.validate_token(&registered.token).await);
    let me = auth.current_user(&registered.token).await.unwrap();
    assert_eq!(me.id, registered.user.id);

    auth.logout(&registered.token).await;
    assert!(
        !cache
            .exists(&cache_keys::token_for_user(&registered.user.id))
            .await
    );

    // Login again by username after logout.
    let again = auth
        .login(LoginRequest {
            identifier: "ada".to_string(),
            password: "correct-horse-battery".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(again.user.id, registered.user.id);
}

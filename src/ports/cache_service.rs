//! Cache service port.
//!
//! The cache is never the system of record. Every operation here is
//! fail-open: an unreachable or misbehaving cache degrades to a miss or a
//! no-op, and implementations must not surface their errors to callers.
//! Absence of a key is only a hint to re-fetch from the primary store.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Key/value cache with TTL and glob-pattern bulk invalidation.
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Fetches the raw serialized value, or `None` on miss or cache failure.
    async fn get_raw(&self, key: &str) -> Option<String>;

    /// Stores a value, best-effort. Failure is swallowed.
    async fn set_raw(&self, key: &str, value: String, ttl: Option<Duration>);

    /// Deletes a key, best-effort.
    async fn remove(&self, key: &str);

    /// Deletes every key matching the glob pattern (`*`, `?`), best-effort.
    ///
    /// Coarse invalidation: a write to any product clears `products:*`
    /// rather than tracking individual keys.
    async fn remove_by_pattern(&self, pattern: &str);

    /// Whether the key currently exists. `false` on cache failure.
    async fn exists(&self, key: &str) -> bool;

    /// Remaining time to live, `None` when absent, persistent, or failing.
    async fn expiration(&self, key: &str) -> Option<Duration>;

    /// Resets the key's time to live, best-effort.
    async fn set_expiration(&self, key: &str, ttl: Duration);
}

/// JSON convenience layer over [`CacheService`].
///
/// Serialization problems count as cache failures: a value that does not
/// decode is treated as a miss, never an error.
#[async_trait]
pub trait CacheServiceExt: CacheService {
    async fn get_json<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let raw = self.get_raw(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding undecodable cache entry");
                None
            }
        }
    }

    async fn set_json<T>(&self, key: &str, value: &T, ttl: Option<Duration>)
    where
        T: Serialize + Sync,
    {
        match serde_json::to_string(value) {
            Ok(raw) => self.set_raw(key, raw, ttl).await,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to serialize cache value");
            }
        }
    }
}

impl<C: CacheService + ?Sized> CacheServiceExt for C {}

//! In-memory cache for tests and development.
//!
//! Honors TTLs against a monotonic clock with lazy eviction: an expired
//! entry counts as absent the moment it is observed.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::ports::CacheService;

use super::glob::glob_match;

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Default)]
pub struct InMemoryCacheService {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryCacheService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheService for InMemoryCacheService {
    async fn get_raw(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone())
    }

    async fn set_raw(&self, key: &str, value: String, ttl: Option<Duration>) {
        let entry = Entry {
            value,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), entry);
    }

    async fn remove(&self, key: &str) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }

    async fn remove_by_pattern(&self, pattern: &str) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.retain(|key, _| !glob_match(pattern, key));
    }

    async fn exists(&self, key: &str) -> bool {
        self.get_raw(key).await.is_some()
    }

    async fn expiration(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let entry = entries.get(key).filter(|entry| !entry.is_expired(now))?;
        entry.expires_at.map(|at| at - now)
    }

    async fn set_expiration(&self, key: &str, ttl: Duration) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = entries.get_mut(key) {
            entry.expires_at = Some(Instant::now() + ttl);
        }
    }
}

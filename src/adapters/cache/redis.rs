//! Redis-backed cache.
//!
//! Every operation is fail-open: connection and command errors are logged
//! at warn and degrade to a miss or a no-op. The cache must never take
//! the write path down with it.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::config::RedisConfig;
use crate::ports::CacheService;

const SCAN_BATCH: usize = 100;

pub struct RedisCacheService {
    conn: MultiplexedConnection,
}

impl RedisCacheService {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }

    /// Opens a multiplexed connection from configuration.
    pub async fn connect(config: &RedisConfig) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(config.url.as_str())?;
        let conn = client.get_multiplexed_tokio_connection().await?;
        Ok(Self::new(conn))
    }

    /// Collects every key matching the pattern via cursor-driven SCAN.
    /// KEYS would block the server; SCAN trades atomicity for liveness,
    /// which is fine for best-effort invalidation.
    async fn matching_keys(
        &self,
        conn: &mut MultiplexedConnection,
        pattern: &str,
    ) -> Result<Vec<String>, redis::RedisError> {
        let mut keys = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(conn)
                .await?;
            keys.extend(batch);
            cursor = next;
            if cursor == 0 {
                break;
            }
        }
        Ok(keys)
    }
}

#[async_trait]
impl CacheService for RedisCacheService {
    async fn get_raw(&self, key: &str) -> Option<String> {
        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache get failed");
                None
            }
        }
    }

    async fn set_raw(&self, key: &str, value: String, ttl: Option<Duration>) {
        let mut conn = self.conn.clone();
        let result = match ttl {
            Some(ttl) => {
                redis::cmd("SET")
                    .arg(key)
                    .arg(&value)
                    .arg("PX")
                    .arg(ttl.as_millis() as u64)
                    .query_async::<_, ()>(&mut conn)
                    .await
            }
            None => conn.set::<_, _, ()>(key, &value).await,
        };
        if let Err(e) = result {
            tracing::warn!(key, error = %e, "cache set failed");
        }
    }

    async fn remove(&self, key: &str) {
        let mut conn = self.conn.clone();
        if let Err(e) = conn.del::<_, ()>(key).await {
            tracing::warn!(key, error = %e, "cache delete failed");
        }
    }

    async fn remove_by_pattern(&self, pattern: &str) {
        let mut conn = self.conn.clone();
        let keys = match self.matching_keys(&mut conn, pattern).await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(pattern, error = %e, "cache scan failed");
                return;
            }
        };
        if keys.is_empty() {
            return;
        }
        let removed = keys.len();
        if let Err(e) = conn.del::<_, ()>(keys).await {
            tracing::warn!(pattern, error = %e, "cache bulk delete failed");
        } else {
            tracing::debug!(pattern, removed, "cache keys invalidated");
        }
    }

    async fn exists(&self, key: &str) -> bool {
        let mut conn = self.conn.clone();
        match conn.exists::<_, bool>(key).await {
            Ok(exists) => exists,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache exists failed");
                false
            }
        }
    }

    async fn expiration(&self, key: &str) -> Option<Duration> {
        let mut conn = self.conn.clone();
        // PTTL: -2 no key, -1 no expiry.
        match redis::cmd("PTTL")
            .arg(key)
            .query_async::<_, i64>(&mut conn)
            .await
        {
            Ok(millis) if millis >= 0 => Some(Duration::from_millis(millis as u64)),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache ttl lookup failed");
                None
            }
        }
    }

    async fn set_expiration(&self, key: &str, ttl: Duration) {
        let mut conn = self.conn.clone();
        if let Err(e) = redis::cmd("PEXPIRE")
            .arg(key)
            .arg(ttl.as_millis() as u64)
            .query_async::<_, i64>(&mut conn)
            .await
        {
            tracing::warn!(key, error = %e, "cache expire failed");
        }
    }
}

//! Read-path query services.
//!
//! Queries are cache-aside over the repositories: look in the cache, fall
//! back to the store, repopulate with a TTL. The cache is fail-open, so a
//! broken cache degrades to store-only reads rather than failing the call.
//! Misses on a specific entity return `Ok(None)` and are never cached.

use std::time::Duration;

mod category_queries;
mod product_queries;

pub use category_queries::CategoryQueries;
pub use product_queries::ProductQueries;

/// Time-to-live policy for cached read models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtl {
    /// Collection keys such as `products:all`.
    pub list: Duration,
    /// Single-entity keys such as `product:<id>`.
    pub entity: Duration,
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self {
            list: Duration::from_secs(600),
            entity: Duration::from_secs(900),
        }
    }
}

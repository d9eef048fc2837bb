//! Cache TTL configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::application::queries::CacheTtl;

/// Time-to-live policy for cached read models, in seconds
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// TTL for collection keys (`products:all` and friends)
    #[serde(default = "default_list_ttl")]
    pub list_ttl_secs: u64,

    /// TTL for single-entity keys (`product:<id>` and friends)
    #[serde(default = "default_entity_ttl")]
    pub entity_ttl_secs: u64,
}

impl CacheConfig {
    /// Convert into the query layer's TTL policy.
    pub fn query_ttl(&self) -> CacheTtl {
        CacheTtl {
            list: std::time::Duration::from_secs(self.list_ttl_secs),
            entity: std::time::Duration::from_secs(self.entity_ttl_secs),
        }
    }

    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.list_ttl_secs == 0 || self.entity_ttl_secs == 0 {
            return Err(ValidationError::InvalidCacheTtl);
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            list_ttl_secs: default_list_ttl(),
            entity_ttl_secs: default_entity_ttl(),
        }
    }
}

fn default_list_ttl() -> u64 {
    600
}

fn default_entity_ttl() -> u64 {
    900
}

//! Cache adapters: Redis for production, an in-memory map for tests.

mod glob;
mod in_memory;
mod redis;

pub use in_memory::InMemoryCacheService;
pub use redis::RedisCacheService;

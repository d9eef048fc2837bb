//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `UnitOfWork` / `UnitOfWorkFactory` - transaction scope + repositories
//! - `ProductRepository` / `CategoryRepository` / `UserRepository` - typed
//!   store access with the soft-delete filter as a standing contract
//! - `CacheService` - fail-open cache-aside store with glob invalidation
//! - `PasswordHasher` - credential hash-and-verify primitive
//! - `TokenService` - signed token issue/verify primitive

mod cache_service;
mod category_repository;
mod password_hasher;
mod product_repository;
mod token_service;
mod unit_of_work;
mod user_repository;

pub use cache_service::{CacheService, CacheServiceExt};
pub use category_repository::CategoryRepository;
pub use password_hasher::PasswordHasher;
pub use product_repository::ProductRepository;
pub use token_service::{TokenClaims, TokenService};
pub use unit_of_work::{UnitOfWork, UnitOfWorkFactory};
pub use user_repository::UserRepository;

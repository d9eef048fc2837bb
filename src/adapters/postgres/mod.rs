//! Postgres persistence adapter.
//!
//! Every read carries the `is_deleted = FALSE` filter; soft-deleted rows
//! are invisible at this layer. Uniqueness is enforced by partial unique
//! indexes over live rows, surfaced as `DuplicateKey`.

mod category_repository;
mod product_repository;
mod tx;
mod unit_of_work;
mod user_repository;

pub use category_repository::PgCategoryRepository;
pub use product_repository::PgProductRepository;
pub use unit_of_work::{PgUnitOfWork, PgUnitOfWorkFactory};
pub use user_repository::PgUserRepository;

//! In-memory persistence for tests and development.
//!
//! The store enforces the same unique constraints the relational schema
//! does, at write time, so duplicate races surface as `DuplicateKey` here
//! just as they would against the real database.

mod unit_of_work;

pub use unit_of_work::{InMemoryStore, InMemoryUnitOfWork, InMemoryUnitOfWorkFactory};

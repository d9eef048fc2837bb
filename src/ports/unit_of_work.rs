//! Unit-of-work port.
//!
//! One unit of work owns one transaction scope and hands out repositories
//! bound to it. An instance is scoped to a single logical operation and is
//! not intended to be shared across concurrent operations.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::ports::{CategoryRepository, ProductRepository, UserRepository};

/// Transaction scope plus repository factory for one logical operation.
///
/// Repository accessors are memoized: repeated calls return the same
/// instance, bound to this unit of work's transaction context. Reads and
/// writes issued through those repositories run inside the open transaction
/// when there is one, otherwise directly against the store.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Product repository bound to this transaction context.
    fn products(&self) -> Arc<dyn ProductRepository>;

    /// Category repository bound to this transaction context.
    fn categories(&self) -> Arc<dyn CategoryRepository>;

    /// User repository bound to this transaction context.
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Opens a new transaction scope.
    ///
    /// # Errors
    ///
    /// - `TransactionAlreadyOpen` if a transaction is already open on this
    ///   instance; at most one is allowed at a time
    /// - `DatabaseError` if the store cannot start a transaction
    async fn begin_transaction(&self) -> Result<(), DomainError>;

    /// Reports rows affected by writes since the last call.
    ///
    /// Writes execute eagerly as they are issued; this is the bookkeeping
    /// point, commit is the durability point.
    async fn save_changes(&self) -> Result<u64, DomainError>;

    /// Commits and releases the open transaction. No-op when none is open.
    async fn commit_transaction(&self) -> Result<(), DomainError>;

    /// Rolls back and releases the open transaction. No-op when none is open.
    async fn rollback_transaction(&self) -> Result<(), DomainError>;
}

/// Creates a fresh unit of work per logical operation.
pub trait UnitOfWorkFactory: Send + Sync {
    fn create(&self) -> Arc<dyn UnitOfWork>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_of_work_is_object_safe() {
        fn _accepts_dyn(_uow: &dyn UnitOfWork) {}
        fn _accepts_factory(_factory: &dyn UnitOfWorkFactory) {}
    }
}

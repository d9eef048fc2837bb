//! Postgres unit of work.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use sqlx::PgPool;

use crate::domain::foundation::DomainError;
use crate::ports::{
    CategoryRepository, ProductRepository, UnitOfWork, UnitOfWorkFactory, UserRepository,
};

use super::category_repository::PgCategoryRepository;
use super::product_repository::PgProductRepository;
use super::tx::TxContext;
use super::user_repository::PgUserRepository;

/// One transactional scope over a shared pool.
///
/// Repositories are memoized per unit of work and route their statements
/// through the shared [`TxContext`], so everything written after
/// `begin_transaction` lands in the same database transaction.
pub struct PgUnitOfWork {
    ctx: Arc<TxContext>,
    products: OnceCell<Arc<PgProductRepository>>,
    categories: OnceCell<Arc<PgCategoryRepository>>,
    users: OnceCell<Arc<PgUserRepository>>,
}

impl PgUnitOfWork {
    pub fn new(pool: PgPool) -> Self {
        Self {
            ctx: Arc::new(TxContext::new(pool)),
            products: OnceCell::new(),
            categories: OnceCell::new(),
            users: OnceCell::new(),
        }
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products
            .get_or_init(|| Arc::new(PgProductRepository::new(self.ctx.clone())))
            .clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories
            .get_or_init(|| Arc::new(PgCategoryRepository::new(self.ctx.clone())))
            .clone()
    }

    fn users(&self) -> Arc<dyn UserRepository> {
        self.users
            .get_or_init(|| Arc::new(PgUserRepository::new(self.ctx.clone())))
            .clone()
    }

    async fn begin_transaction(&self) -> Result<(), DomainError> {
        self.ctx.begin().await
    }

    async fn save_changes(&self) -> Result<u64, DomainError> {
        Ok(self.ctx.take_affected())
    }

    async fn commit_transaction(&self) -> Result<(), DomainError> {
        self.ctx.commit().await
    }

    async fn rollback_transaction(&self) -> Result<(), DomainError> {
        self.ctx.rollback().await
    }
}

pub struct PgUnitOfWorkFactory {
    pool: PgPool,
}

impl PgUnitOfWorkFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UnitOfWorkFactory for PgUnitOfWorkFactory {
    fn create(&self) -> Arc<dyn UnitOfWork> {
        Arc::new(PgUnitOfWork::new(self.pool.clone()))
    }
}

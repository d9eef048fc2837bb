//! Product repository port.
//!
//! # Soft-delete contract
//!
//! Every read defined here filters out soft-deleted rows. That filter is a
//! standing contract of the port, not a per-call-site decision; history
//! access would be a separate, explicit operation.

use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::domain::catalog::{Product, ProductDraft};
use crate::domain::foundation::{CategoryId, DomainError, ProductId};

/// Repository for product persistence and predicate queries.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Inserts a draft and returns the persisted product with its
    /// store-assigned id and creation time.
    ///
    /// # Errors
    ///
    /// - `DuplicateKey` when the store rejects the SKU
    /// - `DatabaseError` on other persistence failures
    async fn insert(&self, draft: &ProductDraft) -> Result<Product, DomainError>;

    /// Updates an existing product.
    ///
    /// # Errors
    ///
    /// - `ProductNotFound` if the product does not exist (or is deleted)
    /// - `DuplicateKey` / `DatabaseError` on persistence failure
    async fn update(&self, product: &Product) -> Result<(), DomainError>;

    /// Soft-deletes a product.
    ///
    /// # Errors
    ///
    /// - `ProductNotFound` if the product does not exist (or is deleted)
    async fn soft_delete(&self, id: &ProductId) -> Result<(), DomainError>;

    /// Finds a product by id. Returns `None` when absent.
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, DomainError>;

    /// Finds a product by SKU. Returns `None` when absent.
    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, DomainError>;

    /// All live products, ordered by name.
    async fn find_all(&self) -> Result<Vec<Product>, DomainError>;

    /// Active products, ordered by name.
    async fn find_active(&self) -> Result<Vec<Product>, DomainError>;

    /// Products belonging to a category.
    async fn find_by_category(&self, category_id: &CategoryId)
        -> Result<Vec<Product>, DomainError>;

    /// Active products priced within the inclusive range, ordered by price.
    async fn find_by_price_range(
        &self,
        min: &BigDecimal,
        max: &BigDecimal,
    ) -> Result<Vec<Product>, DomainError>;

    /// Active products at or below the stock threshold, ordered by stock.
    async fn find_low_stock(&self, threshold: i32) -> Result<Vec<Product>, DomainError>;

    /// Products whose name or description contains the term, ordered by name.
    async fn search_by_name(&self, term: &str) -> Result<Vec<Product>, DomainError>;

    /// Whether no live product other than `exclude` carries this SKU.
    ///
    /// Soft-deleted rows do not count; a SKU frees up on soft delete.
    async fn is_sku_unique(
        &self,
        sku: &str,
        exclude: Option<&ProductId>,
    ) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ProductRepository) {}
    }
}

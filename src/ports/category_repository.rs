//! Category repository port.
//!
//! Reads exclude soft-deleted rows as a standing contract, same as the
//! product port.

use async_trait::async_trait;

use crate::domain::catalog::{Category, CategoryDraft};
use crate::domain::foundation::{CategoryId, DomainError};

/// Repository for category persistence and predicate queries.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Inserts a draft and returns the persisted category.
    ///
    /// # Errors
    ///
    /// - `DuplicateKey` when the store rejects the name
    /// - `DatabaseError` on other persistence failures
    async fn insert(&self, draft: &CategoryDraft) -> Result<Category, DomainError>;

    /// Updates an existing category.
    ///
    /// # Errors
    ///
    /// - `CategoryNotFound` if the category does not exist (or is deleted)
    async fn update(&self, category: &Category) -> Result<(), DomainError>;

    /// Soft-deletes a category.
    ///
    /// # Errors
    ///
    /// - `CategoryNotFound` if the category does not exist (or is deleted)
    async fn soft_delete(&self, id: &CategoryId) -> Result<(), DomainError>;

    /// Finds a category by id. Returns `None` when absent.
    async fn find_by_id(&self, id: &CategoryId) -> Result<Option<Category>, DomainError>;

    /// All live categories, ordered by name.
    async fn find_all(&self) -> Result<Vec<Category>, DomainError>;

    /// Active categories, ordered by name.
    async fn find_active(&self) -> Result<Vec<Category>, DomainError>;

    /// Categories whose name or description contains the term.
    async fn search_by_name(&self, term: &str) -> Result<Vec<Category>, DomainError>;

    /// Whether no live category other than `exclude` carries this name.
    async fn is_name_unique(
        &self,
        name: &str,
        exclude: Option<&CategoryId>,
    ) -> Result<bool, DomainError>;

    /// Number of live products owned by the category.
    async fn product_count(&self, id: &CategoryId) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn CategoryRepository) {}
    }
}

//! Category business rules.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::catalog::{Category, CategoryDraft};
use crate::domain::foundation::{BusinessRuleResult, CategoryId};
use crate::ports::UnitOfWork;

use super::BusinessRule;

/// The category name must be present and carried by no other live category.
pub struct CategoryNameMustBeUnique {
    uow: Arc<dyn UnitOfWork>,
    exclude: Option<CategoryId>,
}

impl CategoryNameMustBeUnique {
    pub fn new(uow: Arc<dyn UnitOfWork>, exclude: Option<CategoryId>) -> Self {
        Self { uow, exclude }
    }
}

#[async_trait]
impl BusinessRule<CategoryDraft> for CategoryNameMustBeUnique {
    async fn validate(&self, candidate: &CategoryDraft) -> BusinessRuleResult {
        if candidate.name.trim().is_empty() {
            return BusinessRuleResult::fail(
                "CATEGORY_NAME_EMPTY",
                "Category name cannot be empty",
            );
        }

        match self
            .uow
            .categories()
            .is_name_unique(&candidate.name, self.exclude.as_ref())
            .await
        {
            Ok(true) => BusinessRuleResult::pass(),
            Ok(false) => BusinessRuleResult::fail(
                "CATEGORY_NAME_DUPLICATE",
                format!("Category with name '{}' already exists", candidate.name),
            ),
            Err(e) => BusinessRuleResult::fail(
                "CATEGORY_NAME_CHECK_FAILED",
                format!("Could not verify category name uniqueness: {}", e),
            ),
        }
    }
}

/// A category that still owns live products refuses deletion.
pub struct CategoryCannotBeDeletedWithProducts {
    uow: Arc<dyn UnitOfWork>,
}

impl CategoryCannotBeDeletedWithProducts {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl BusinessRule<Category> for CategoryCannotBeDeletedWithProducts {
    async fn validate(&self, candidate: &Category) -> BusinessRuleResult {
        match self.uow.categories().product_count(&candidate.id).await {
            Ok(0) => BusinessRuleResult::pass(),
            Ok(count) => BusinessRuleResult::fail(
                "CATEGORY_HAS_PRODUCTS",
                format!(
                    "Cannot delete category '{}' because it has {} product(s)",
                    candidate.name, count
                ),
            ),
            Err(e) => BusinessRuleResult::fail(
                "CATEGORY_PRODUCT_COUNT_FAILED",
                format!("Could not count products for category: {}", e),
            ),
        }
    }
}

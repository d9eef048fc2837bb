//! Full-replacement product update.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::cache_keys;
use crate::application::dto::{product_to_dto, ProductDto, UpdateProductRequest};
use crate::application::rules::{
    evaluate_all, BusinessRule, ProductMustHaveValidCategory, ProductPriceMustBeValid,
    ProductSkuMustBeUnique, ProductStockMustBeValid,
};
use crate::domain::catalog::{Product, ProductDraft};
use crate::domain::foundation::{DomainError, OrchestratorResult, ProductId};
use crate::ports::{CacheService, UnitOfWork};

pub struct UpdateProductOrchestrator {
    uow: Arc<dyn UnitOfWork>,
    cache: Arc<dyn CacheService>,
}

impl UpdateProductOrchestrator {
    pub fn new(uow: Arc<dyn UnitOfWork>, cache: Arc<dyn CacheService>) -> Self {
        Self { uow, cache }
    }

    /// Uniqueness checks exclude the product being updated so an unchanged
    /// SKU does not collide with itself.
    fn rules(&self, id: ProductId) -> Vec<Box<dyn BusinessRule<ProductDraft>>> {
        vec![
            Box::new(ProductSkuMustBeUnique::new(self.uow.clone(), Some(id))),
            Box::new(ProductMustHaveValidCategory::new(self.uow.clone())),
            Box::new(ProductPriceMustBeValid),
            Box::new(ProductStockMustBeValid),
        ]
    }

    async fn persist(
        &self,
        mut product: Product,
        draft: ProductDraft,
    ) -> Result<ProductDto, DomainError> {
        product.apply(draft);
        self.uow.products().update(&product).await?;
        self.uow.save_changes().await?;
        let category = self.uow.categories().find_by_id(&product.category_id).await?;
        Ok(product_to_dto(&product, category.map(|c| c.name)))
    }

    async fn invalidate(&self, id: &ProductId) {
        self.cache
            .remove_by_pattern(cache_keys::PRODUCTS_PATTERN)
            .await;
        self.cache.remove(&cache_keys::product_by_id(id)).await;
    }
}

#[async_trait]
impl super::Orchestrator<UpdateProductRequest, ProductDto> for UpdateProductOrchestrator {
    async fn execute(&self, input: UpdateProductRequest) -> OrchestratorResult<ProductDto> {
        let existing = match self.uow.products().find_by_id(&input.id).await {
            Ok(Some(product)) => product,
            Ok(None) => return OrchestratorResult::Failure("Product not found".to_string()),
            Err(e) => {
                return OrchestratorResult::Failure(format!("Failed to update product: {}", e))
            }
        };

        // The active flag is not part of the update surface; it survives
        // the replacement unchanged.
        let draft = input.to_draft(existing.is_active);

        let violations = evaluate_all(&self.rules(input.id), &draft).await;
        if !violations.is_empty() {
            return OrchestratorResult::validation_failure(violations);
        }

        if let Err(e) = self.uow.begin_transaction().await {
            return OrchestratorResult::Failure(format!("Failed to update product: {}", e));
        }

        match self.persist(existing, draft).await {
            Ok(dto) => {
                if let Err(e) = self.uow.commit_transaction().await {
                    return OrchestratorResult::Failure(format!("Failed to update product: {}", e));
                }
                self.invalidate(&input.id).await;
                OrchestratorResult::Success(dto)
            }
            Err(e) => {
                tracing::error!(product_id = %input.id, error = %e, "product update failed, rolling back");
                if let Err(rb) = self.uow.rollback_transaction().await {
                    tracing::error!(error = %rb, "rollback failed");
                }
                OrchestratorResult::Failure(format!("Failed to update product: {}", e))
            }
        }
    }
}

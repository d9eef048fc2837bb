//! Product creation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::cache_keys;
use crate::application::dto::{product_to_dto, CreateProductRequest, ProductDto};
use crate::application::rules::{
    evaluate_all, BusinessRule, ProductMustHaveValidCategory, ProductPriceMustBeValid,
    ProductSkuMustBeUnique, ProductStockMustBeValid,
};
use crate::domain::catalog::ProductDraft;
use crate::domain::foundation::{DomainError, OrchestratorResult};
use crate::ports::{CacheService, UnitOfWork};

pub struct CreateProductOrchestrator {
    uow: Arc<dyn UnitOfWork>,
    cache: Arc<dyn CacheService>,
}

impl CreateProductOrchestrator {
    pub fn new(uow: Arc<dyn UnitOfWork>, cache: Arc<dyn CacheService>) -> Self {
        Self { uow, cache }
    }

    fn rules(&self) -> Vec<Box<dyn BusinessRule<ProductDraft>>> {
        vec![
            Box::new(ProductSkuMustBeUnique::new(self.uow.clone(), None)),
            Box::new(ProductMustHaveValidCategory::new(self.uow.clone())),
            Box::new(ProductPriceMustBeValid),
            Box::new(ProductStockMustBeValid),
        ]
    }

    async fn persist(&self, draft: &ProductDraft) -> Result<ProductDto, DomainError> {
        let product = self.uow.products().insert(draft).await?;
        self.uow.save_changes().await?;
        let category = self.uow.categories().find_by_id(&product.category_id).await?;
        Ok(product_to_dto(&product, category.map(|c| c.name)))
    }
}

#[async_trait]
impl super::Orchestrator<CreateProductRequest, ProductDto> for CreateProductOrchestrator {
    async fn execute(&self, input: CreateProductRequest) -> OrchestratorResult<ProductDto> {
        let draft = input.into_draft();

        let violations = evaluate_all(&self.rules(), &draft).await;
        if !violations.is_empty() {
            return OrchestratorResult::validation_failure(violations);
        }

        if let Err(e) = self.uow.begin_transaction().await {
            return OrchestratorResult::Failure(format!("Failed to create product: {}", e));
        }

        match self.persist(&draft).await {
            Ok(dto) => {
                if let Err(e) = self.uow.commit_transaction().await {
                    return OrchestratorResult::Failure(format!("Failed to create product: {}", e));
                }
                self.cache
                    .remove_by_pattern(cache_keys::PRODUCTS_PATTERN)
                    .await;
                OrchestratorResult::Success(dto)
            }
            Err(e) => {
                tracing::error!(error = %e, "product creation failed, rolling back");
                if let Err(rb) = self.uow.rollback_transaction().await {
                    tracing::error!(error = %rb, "rollback failed");
                }
                OrchestratorResult::Failure(format!("Failed to create product: {}", e))
            }
        }
    }
}

//! Category soft deletion, guarded by the referencing-products rule.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::cache_keys;
use crate::application::rules::{evaluate_all, BusinessRule, CategoryCannotBeDeletedWithProducts};
use crate::domain::catalog::Category;
use crate::domain::foundation::{CategoryId, OrchestratorResult};
use crate::ports::{CacheService, UnitOfWork};

pub struct DeleteCategoryOrchestrator {
    uow: Arc<dyn UnitOfWork>,
    cache: Arc<dyn CacheService>,
}

impl DeleteCategoryOrchestrator {
    pub fn new(uow: Arc<dyn UnitOfWork>, cache: Arc<dyn CacheService>) -> Self {
        Self { uow, cache }
    }

    fn rules(&self) -> Vec<Box<dyn BusinessRule<Category>>> {
        vec![Box::new(CategoryCannotBeDeletedWithProducts::new(
            self.uow.clone(),
        ))]
    }
}

#[async_trait]
impl super::Orchestrator<CategoryId, bool> for DeleteCategoryOrchestrator {
    async fn execute(&self, id: CategoryId) -> OrchestratorResult<bool> {
        let category = match self.uow.categories().find_by_id(&id).await {
            Ok(Some(category)) => category,
            Ok(None) => return OrchestratorResult::Failure("Category not found".to_string()),
            Err(e) => {
                return OrchestratorResult::Failure(format!("Failed to delete category: {}", e))
            }
        };

        let violations = evaluate_all(&self.rules(), &category).await;
        if !violations.is_empty() {
            return OrchestratorResult::validation_failure(violations);
        }

        if let Err(e) = self.uow.begin_transaction().await {
            return OrchestratorResult::Failure(format!("Failed to delete category: {}", e));
        }

        let outcome = async {
            self.uow.categories().soft_delete(&id).await?;
            self.uow.save_changes().await
        }
        .await;

        match outcome {
            Ok(_) => {
                if let Err(e) = self.uow.commit_transaction().await {
                    return OrchestratorResult::Failure(format!(
                        "Failed to delete category: {}",
                        e
                    ));
                }
                self.cache
                    .remove_by_pattern(cache_keys::CATEGORIES_PATTERN)
                    .await;
                self.cache.remove(&cache_keys::category_by_id(&id)).await;
                OrchestratorResult::Success(true)
            }
            Err(e) => {
                tracing::error!(category_id = %id, error = %e, "category deletion failed, rolling back");
                if let Err(rb) = self.uow.rollback_transaction().await {
                    tracing::error!(error = %rb, "rollback failed");
                }
                OrchestratorResult::Failure(format!("Failed to delete category: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::adapters::cache::InMemoryCacheService;
    use crate::adapters::memory::{InMemoryStore, InMemoryUnitOfWork};
    use crate::application::orchestrators::Orchestrator;
    use crate::domain::catalog::{CategoryDraft, ProductDraft};

    async fn seeded(with_product: bool) -> (Arc<InMemoryStore>, CategoryId) {
        let store = InMemoryStore::new();
        let uow = InMemoryUnitOfWork::new(store.clone());
        let category = uow
            .categories()
            .insert(&CategoryDraft {
                name: "Electronics".to_string(),
                description: None,
                is_active: true,
            })
            .await
            .unwrap();
        if with_product {
            uow.products()
                .insert(&ProductDraft {
                    name: "Widget".to_string(),
                    description: None,
                    price: BigDecimal::from_str("19.99").unwrap(),
                    sku: None,
                    stock_quantity: 1,
                    is_active: true,
                    category_id: category.id,
                })
                .await
                .unwrap();
        }
        (store, category.id)
    }

    #[tokio::test]
    async fn deletes_an_empty_category() {
        let (store, id) = seeded(false).await;
        let uow: Arc<dyn UnitOfWork> = Arc::new(InMemoryUnitOfWork::new(store.clone()));
        let orchestrator =
            DeleteCategoryOrchestrator::new(uow.clone(), Arc::new(InMemoryCacheService::new()));

        assert!(orchestrator.execute(id).await.is_success());
        assert!(uow.categories().find_by_id(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn refuses_while_products_reference_it() {
        let (store, id) = seeded(true).await;
        let uow: Arc<dyn UnitOfWork> = Arc::new(InMemoryUnitOfWork::new(store.clone()));
        let orchestrator =
            DeleteCategoryOrchestrator::new(uow.clone(), Arc::new(InMemoryCacheService::new()));

        let result = orchestrator.execute(id).await;
        assert_eq!(
            result.violations().expect("expected validation failure")[0].code,
            "CATEGORY_HAS_PRODUCTS"
        );
        // The category is untouched, not half-deleted.
        let category = uow.categories().find_by_id(&id).await.unwrap().unwrap();
        assert!(!category.audit.is_deleted);
    }
}

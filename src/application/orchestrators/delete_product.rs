//! Product soft deletion. No business rules guard this operation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::cache_keys;
use crate::domain::foundation::{OrchestratorResult, ProductId};
use crate::ports::{CacheService, UnitOfWork};

pub struct DeleteProductOrchestrator {
    uow: Arc<dyn UnitOfWork>,
    cache: Arc<dyn CacheService>,
}

impl DeleteProductOrchestrator {
    pub fn new(uow: Arc<dyn UnitOfWork>, cache: Arc<dyn CacheService>) -> Self {
        Self { uow, cache }
    }
}

#[async_trait]
impl super::Orchestrator<ProductId, bool> for DeleteProductOrchestrator {
    async fn execute(&self, id: ProductId) -> OrchestratorResult<bool> {
        match self.uow.products().find_by_id(&id).await {
            Ok(Some(_)) => {}
            Ok(None) => return OrchestratorResult::Failure("Product not found".to_string()),
            Err(e) => {
                return OrchestratorResult::Failure(format!("Failed to delete product: {}", e))
            }
        }

        if let Err(e) = self.uow.begin_transaction().await {
            return OrchestratorResult::Failure(format!("Failed to delete product: {}", e));
        }

        let outcome = async {
            self.uow.products().soft_delete(&id).await?;
            self.uow.save_changes().await
        }
        .await;

        match outcome {
            Ok(_) => {
                if let Err(e) = self.uow.commit_transaction().await {
                    return OrchestratorResult::Failure(format!("Failed to delete product: {}", e));
                }
                self.cache
                    .remove_by_pattern(cache_keys::PRODUCTS_PATTERN)
                    .await;
                self.cache.remove(&cache_keys::product_by_id(&id)).await;
                OrchestratorResult::Success(true)
            }
            Err(e) => {
                tracing::error!(product_id = %id, error = %e, "product deletion failed, rolling back");
                if let Err(rb) = self.uow.rollback_transaction().await {
                    tracing::error!(error = %rb, "rollback failed");
                }
                OrchestratorResult::Failure(format!("Failed to delete product: {}", e))
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

    async fn seeded() -> (Arc<InMemoryStore>, ProductId) {
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
        let product = uow
            .products()
            .insert(&ProductDraft {
                name: "Widget".to_string(),
                description: None,
                price: BigDecimal::from_str("19.99").unwrap(),
                sku: Some("WID-001".to_string()),
                stock_quantity: 5,
                is_active: true,
                category_id: category.id,
            })
            .await
            .unwrap();
        (store, product.id)
    }

    #[tokio::test]
    async fn soft_deletes_and_hides_from_reads() {
        let (store, id) = seeded().await;
        let uow: Arc<dyn UnitOfWork> = Arc::new(InMemoryUnitOfWork::new(store.clone()));
        let orchestrator =
            DeleteProductOrchestrator::new(uow.clone(), Arc::new(InMemoryCacheService::new()));

        assert!(orchestrator.execute(id).await.is_success());
        assert!(uow.products().find_by_id(&id).await.unwrap().is_none());
        assert!(uow.products().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_twice_reports_not_found() {
        let (store, id) = seeded().await;
        let orchestrator = DeleteProductOrchestrator::new(
            Arc::new(InMemoryUnitOfWork::new(store.clone())),
            Arc::new(InMemoryCacheService::new()),
        );

        assert!(orchestrator.execute(id).await.is_success());
        match orchestrator.execute(id).await {
            OrchestratorResult::Failure(message) => assert_eq!(message, "Product not found"),
            other => panic!("expected failure, got {:?}", other),
        }
    }
}

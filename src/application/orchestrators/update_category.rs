//! Category update.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::cache_keys;
use crate::application::dto::{category_to_dto, CategoryDto, UpdateCategoryRequest};
use crate::application::rules::{evaluate_all, BusinessRule, CategoryNameMustBeUnique};
use crate::domain::catalog::{Category, CategoryDraft};
use crate::domain::foundation::{CategoryId, DomainError, OrchestratorResult};
use crate::ports::{CacheService, UnitOfWork};

pub struct UpdateCategoryOrchestrator {
    uow: Arc<dyn UnitOfWork>,
    cache: Arc<dyn CacheService>,
}

impl UpdateCategoryOrchestrator {
    pub fn new(uow: Arc<dyn UnitOfWork>, cache: Arc<dyn CacheService>) -> Self {
        Self { uow, cache }
    }

    fn rules(&self, id: CategoryId) -> Vec<Box<dyn BusinessRule<CategoryDraft>>> {
        vec![Box::new(CategoryNameMustBeUnique::new(
            self.uow.clone(),
            Some(id),
        ))]
    }

    async fn persist(
        &self,
        mut category: Category,
        draft: CategoryDraft,
    ) -> Result<CategoryDto, DomainError> {
        category.apply(draft);
        self.uow.categories().update(&category).await?;
        self.uow.save_changes().await?;
        Ok(category_to_dto(&category))
    }
}

#[async_trait]
impl super::Orchestrator<UpdateCategoryRequest, CategoryDto> for UpdateCategoryOrchestrator {
    async fn execute(&self, input: UpdateCategoryRequest) -> OrchestratorResult<CategoryDto> {
        let existing = match self.uow.categories().find_by_id(&input.id).await {
            Ok(Some(category)) => category,
            Ok(None) => return OrchestratorResult::Failure("Category not found".to_string()),
            Err(e) => {
                return OrchestratorResult::Failure(format!("Failed to update category: {}", e))
            }
        };

        let draft = input.to_draft();
        let violations = evaluate_all(&self.rules(input.id), &draft).await;
        if !violations.is_empty() {
            return OrchestratorResult::validation_failure(violations);
        }

        if let Err(e) = self.uow.begin_transaction().await {
            return OrchestratorResult::Failure(format!("Failed to update category: {}", e));
        }

        match self.persist(existing, draft).await {
            Ok(dto) => {
                if let Err(e) = self.uow.commit_transaction().await {
                    return OrchestratorResult::Failure(format!(
                        "Failed to update category: {}",
                        e
                    ));
                }
                self.cache
                    .remove_by_pattern(cache_keys::CATEGORIES_PATTERN)
                    .await;
                self.cache
                    .remove(&cache_keys::category_by_id(&input.id))
                    .await;
                OrchestratorResult::Success(dto)
            }
            Err(e) => {
                tracing::error!(category_id = %input.id, error = %e, "category update failed, rolling back");
                if let Err(rb) = self.uow.rollback_transaction().await {
                    tracing::error!(error = %rb, "rollback failed");
                }
                OrchestratorResult::Failure(format!("Failed to update category: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::InMemoryCacheService;
    use crate::adapters::memory::{InMemoryStore, InMemoryUnitOfWork};
    use crate::application::orchestrators::Orchestrator;

    async fn seeded(names: &[&str]) -> (Arc<InMemoryStore>, Vec<CategoryId>) {
        let store = InMemoryStore::new();
        let uow = InMemoryUnitOfWork::new(store.clone());
        let mut ids = Vec::new();
        for name in names {
            let category = uow
                .categories()
                .insert(&CategoryDraft {
                    name: name.to_string(),
                    description: None,
                    is_active: true,
                })
                .await
                .unwrap();
            ids.push(category.id);
        }
        (store, ids)
    }

    #[tokio::test]
    async fn renames_and_can_deactivate() {
        let (store, ids) = seeded(&["Electronics"]).await;
        let orchestrator = UpdateCategoryOrchestrator::new(
            Arc::new(InMemoryUnitOfWork::new(store)),
            Arc::new(InMemoryCacheService::new()),
        );

        let dto = orchestrator
            .execute(UpdateCategoryRequest {
                id: ids[0],
                name: "Consumer Electronics".to_string(),
                description: None,
                is_active: false,
            })
            .await
            .into_success()
            .unwrap();
        assert_eq!(dto.name, "Consumer Electronics");
        assert!(!dto.is_active);
        assert!(dto.updated_at.is_some());
    }

    #[tokio::test]
    async fn keeping_own_name_passes_but_taking_anothers_fails() {
        let (store, ids) = seeded(&["Electronics", "Books"]).await;
        let orchestrator = UpdateCategoryOrchestrator::new(
            Arc::new(InMemoryUnitOfWork::new(store)),
            Arc::new(InMemoryCacheService::new()),
        );

        let own_name = orchestrator
            .execute(UpdateCategoryRequest {
                id: ids[0],
                name: "Electronics".to_string(),
                description: Some("desc".to_string()),
                is_active: true,
            })
            .await;
        assert!(own_name.is_success());

        let stolen = orchestrator
            .execute(UpdateCategoryRequest {
                id: ids[0],
                name: "Books".to_string(),
                description: None,
                is_active: true,
            })
            .await;
        assert_eq!(
            stolen.violations().expect("expected validation failure")[0].code,
            "CATEGORY_NAME_DUPLICATE"
        );
    }

    #[tokio::test]
    async fn missing_category_is_a_terminal_failure() {
        let (store, _) = seeded(&[]).await;
        let orchestrator = UpdateCategoryOrchestrator::new(
            Arc::new(InMemoryUnitOfWork::new(store)),
            Arc::new(InMemoryCacheService::new()),
        );

        match orchestrator
            .execute(UpdateCategoryRequest {
                id: CategoryId::new(),
                name: "Ghost".to_string(),
                description: None,
                is_active: true,
            })
            .await
        {
            OrchestratorResult::Failure(message) => assert_eq!(message, "Category not found"),
            other => panic!("expected failure, got {:?}", other),
        }
    }
}

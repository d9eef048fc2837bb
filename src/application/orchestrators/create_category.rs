//! Category creation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::cache_keys;
use crate::application::dto::{category_to_dto, CategoryDto, CreateCategoryRequest};
use crate::application::rules::{evaluate_all, BusinessRule, CategoryNameMustBeUnique};
use crate::domain::catalog::CategoryDraft;
use crate::domain::foundation::{DomainError, OrchestratorResult};
use crate::ports::{CacheService, UnitOfWork};

pub struct CreateCategoryOrchestrator {
    uow: Arc<dyn UnitOfWork>,
    cache: Arc<dyn CacheService>,
}

impl CreateCategoryOrchestrator {
    pub fn new(uow: Arc<dyn UnitOfWork>, cache: Arc<dyn CacheService>) -> Self {
        Self { uow, cache }
    }

    fn rules(&self) -> Vec<Box<dyn BusinessRule<CategoryDraft>>> {
        vec![Box::new(CategoryNameMustBeUnique::new(self.uow.clone(), None))]
    }

    async fn persist(&self, draft: &CategoryDraft) -> Result<CategoryDto, DomainError> {
        let category = self.uow.categories().insert(draft).await?;
        self.uow.save_changes().await?;
        Ok(category_to_dto(&category))
    }
}

#[async_trait]
impl super::Orchestrator<CreateCategoryRequest, CategoryDto> for CreateCategoryOrchestrator {
    async fn execute(&self, input: CreateCategoryRequest) -> OrchestratorResult<CategoryDto> {
        let draft = input.into_draft();

        let violations = evaluate_all(&self.rules(), &draft).await;
        if !violations.is_empty() {
            return OrchestratorResult::validation_failure(violations);
        }

        if let Err(e) = self.uow.begin_transaction().await {
            return OrchestratorResult::Failure(format!("Failed to create category: {}", e));
        }

        match self.persist(&draft).await {
            Ok(dto) => {
                if let Err(e) = self.uow.commit_transaction().await {
                    return OrchestratorResult::Failure(format!(
                        "Failed to create category: {}",
                        e
                    ));
                }
                self.cache
                    .remove_by_pattern(cache_keys::CATEGORIES_PATTERN)
                    .await;
                OrchestratorResult::Success(dto)
            }
            Err(e) => {
                tracing::error!(error = %e, "category creation failed, rolling back");
                if let Err(rb) = self.uow.rollback_transaction().await {
                    tracing::error!(error = %rb, "rollback failed");
                }
                OrchestratorResult::Failure(format!("Failed to create category: {}", e))
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
    use crate::ports::CacheServiceExt;

    fn request(name: &str) -> CreateCategoryRequest {
        CreateCategoryRequest {
            name: name.to_string(),
            description: Some("Things with plugs".to_string()),
        }
    }

    #[tokio::test]
    async fn creates_active_category_and_clears_category_cache() {
        let store = InMemoryStore::new();
        let cache = Arc::new(InMemoryCacheService::new());
        cache
            .set_json(
                &cache_keys::all_categories(),
                &Vec::<CategoryDto>::new(),
                None,
            )
            .await;

        let orchestrator = CreateCategoryOrchestrator::new(
            Arc::new(InMemoryUnitOfWork::new(store)),
            cache.clone(),
        );
        let dto = orchestrator
            .execute(request("Electronics"))
            .await
            .into_success()
            .unwrap();
        assert!(dto.is_active);
        assert!(!cache.exists(&cache_keys::all_categories()).await);
    }

    #[tokio::test]
    async fn duplicate_name_is_a_validation_failure() {
        let store = InMemoryStore::new();
        let cache = Arc::new(InMemoryCacheService::new());
        let orchestrator = CreateCategoryOrchestrator::new(
            Arc::new(InMemoryUnitOfWork::new(store)),
            cache,
        );

        assert!(orchestrator.execute(request("Electronics")).await.is_success());
        let result = orchestrator.execute(request("Electronics")).await;
        let violations = result.violations().expect("expected validation failure");
        assert_eq!(violations[0].code, "CATEGORY_NAME_DUPLICATE");
    }
}

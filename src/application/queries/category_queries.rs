//! Category read models.

use std::sync::Arc;

use crate::application::cache_keys;
use crate::application::dto::{category_to_dto, CategoryDto};
use crate::domain::foundation::{CategoryId, DomainError};
use crate::ports::{CacheService, CacheServiceExt, UnitOfWork, UnitOfWorkFactory};

use super::CacheTtl;

pub struct CategoryQueries {
    factory: Arc<dyn UnitOfWorkFactory>,
    cache: Arc<dyn CacheService>,
    ttl: CacheTtl,
}

impl CategoryQueries {
    pub fn new(
        factory: Arc<dyn UnitOfWorkFactory>,
        cache: Arc<dyn CacheService>,
        ttl: CacheTtl,
    ) -> Self {
        Self {
            factory,
            cache,
            ttl,
        }
    }

    /// Every live category, cached under `categories:all`.
    pub async fn all(&self) -> Result<Vec<CategoryDto>, DomainError> {
        let key = cache_keys::all_categories();
        if let Some(cached) = self.cache.get_json::<Vec<CategoryDto>>(&key).await {
            return Ok(cached);
        }
        let uow = self.factory.create();
        let categories = uow.categories().find_all().await?;
        let dtos: Vec<CategoryDto> = categories.iter().map(category_to_dto).collect();
        self.cache.set_json(&key, &dtos, Some(self.ttl.list)).await;
        Ok(dtos)
    }

    /// Live and active categories, cached under `categories:active`.
    pub async fn active(&self) -> Result<Vec<CategoryDto>, DomainError> {
        let key = cache_keys::active_categories();
        if let Some(cached) = self.cache.get_json::<Vec<CategoryDto>>(&key).await {
            return Ok(cached);
        }
        let uow = self.factory.create();
        let categories = uow.categories().find_active().await?;
        let dtos: Vec<CategoryDto> = categories.iter().map(category_to_dto).collect();
        self.cache.set_json(&key, &dtos, Some(self.ttl.list)).await;
        Ok(dtos)
    }

    /// One category by id, cached under `category:<id>`. Misses are not
    /// cached.
    pub async fn by_id(&self, id: &CategoryId) -> Result<Option<CategoryDto>, DomainError> {
        let key = cache_keys::category_by_id(id);
        if let Some(cached) = self.cache.get_json::<CategoryDto>(&key).await {
            return Ok(Some(cached));
        }
        let uow = self.factory.create();
        let Some(category) = uow.categories().find_by_id(id).await? else {
            return Ok(None);
        };
        let dto = category_to_dto(&category);
        self.cache.set_json(&key, &dto, Some(self.ttl.entity)).await;
        Ok(Some(dto))
    }

    pub async fn search(&self, term: &str) -> Result<Vec<CategoryDto>, DomainError> {
        let uow = self.factory.create();
        let categories = uow.categories().search_by_name(term).await?;
        Ok(categories.iter().map(category_to_dto).collect())
    }

    /// Number of live products referencing the category.
    pub async fn product_count(&self, id: &CategoryId) -> Result<u64, DomainError> {
        let uow = self.factory.create();
        uow.categories().product_count(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::InMemoryCacheService;
    use crate::adapters::memory::{InMemoryStore, InMemoryUnitOfWork, InMemoryUnitOfWorkFactory};
    use crate::domain::catalog::CategoryDraft;
    use crate::ports::UnitOfWork;

    async fn fixture(names_active: &[(&str, bool)]) -> (CategoryQueries, Arc<InMemoryCacheService>, Vec<CategoryId>) {
        let store = InMemoryStore::new();
        let uow = InMemoryUnitOfWork::new(store.clone());
        let mut ids = Vec::new();
        for (name, is_active) in names_active {
            let category = uow
                .categories()
                .insert(&CategoryDraft {
                    name: name.to_string(),
                    description: None,
                    is_active: *is_active,
                })
                .await
                .unwrap();
            ids.push(category.id);
        }
        let cache = Arc::new(InMemoryCacheService::new());
        let queries = CategoryQueries::new(
            Arc::new(InMemoryUnitOfWorkFactory::new(store)),
            cache.clone(),
            CacheTtl::default(),
        );
        (queries, cache, ids)
    }

    #[tokio::test]
    async fn active_filters_and_caches_separately_from_all() {
        let (queries, cache, _) = fixture(&[("Electronics", true), ("Legacy", false)]).await;

        assert_eq!(queries.all().await.unwrap().len(), 2);
        assert_eq!(queries.active().await.unwrap().len(), 1);
        assert!(cache.exists(&cache_keys::all_categories()).await);
        assert!(cache.exists(&cache_keys::active_categories()).await);
    }

    #[tokio::test]
    async fn by_id_caches_hits_only() {
        let (queries, cache, ids) = fixture(&[("Electronics", true)]).await;

        let ghost = CategoryId::new();
        assert!(queries.by_id(&ghost).await.unwrap().is_none());
        assert!(!cache.exists(&cache_keys::category_by_id(&ghost)).await);

        assert!(queries.by_id(&ids[0]).await.unwrap().is_some());
        assert!(cache.exists(&cache_keys::category_by_id(&ids[0])).await);
    }

    #[tokio::test]
    async fn search_matches_case_insensitively() {
        let (queries, _, _) = fixture(&[("Electronics", true), ("Books", true)]).await;
        let hits = queries.search("ELEC").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Electronics");
    }

    #[tokio::test]
    async fn product_count_starts_at_zero() {
        let (queries, _, ids) = fixture(&[("Electronics", true)]).await;
        assert_eq!(queries.product_count(&ids[0]).await.unwrap(), 0);
    }
}

//! Product read models.

use std::sync::Arc;

use bigdecimal::BigDecimal;

use crate::application::cache_keys;
use crate::application::dto::{product_to_dto, ProductDto};
use crate::domain::catalog::Product;
use crate::domain::foundation::{CategoryId, DomainError, ProductId};
use crate::ports::{CacheService, CacheServiceExt, UnitOfWork, UnitOfWorkFactory};

use super::CacheTtl;

pub struct ProductQueries {
    factory: Arc<dyn UnitOfWorkFactory>,
    cache: Arc<dyn CacheService>,
    ttl: CacheTtl,
}

impl ProductQueries {
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

    async fn to_dtos(
        &self,
        uow: &Arc<dyn UnitOfWork>,
        products: Vec<Product>,
    ) -> Result<Vec<ProductDto>, DomainError> {
        let mut dtos = Vec::with_capacity(products.len());
        for product in &products {
            let category = uow.categories().find_by_id(&product.category_id).await?;
            dtos.push(product_to_dto(product, category.map(|c| c.name)));
        }
        Ok(dtos)
    }

    /// Every live product, cached under `products:all`.
    pub async fn all(&self) -> Result<Vec<ProductDto>, DomainError> {
        let key = cache_keys::all_products();
        if let Some(cached) = self.cache.get_json::<Vec<ProductDto>>(&key).await {
            return Ok(cached);
        }
        let uow = self.factory.create();
        let products = uow.products().find_all().await?;
        let dtos = self.to_dtos(&uow, products).await?;
        self.cache.set_json(&key, &dtos, Some(self.ttl.list)).await;
        Ok(dtos)
    }

    /// One product by id, cached under `product:<id>`. Misses are not cached.
    pub async fn by_id(&self, id: &ProductId) -> Result<Option<ProductDto>, DomainError> {
        let key = cache_keys::product_by_id(id);
        if let Some(cached) = self.cache.get_json::<ProductDto>(&key).await {
            return Ok(Some(cached));
        }
        let uow = self.factory.create();
        let Some(product) = uow.products().find_by_id(id).await? else {
            return Ok(None);
        };
        let category = uow.categories().find_by_id(&product.category_id).await?;
        let dto = product_to_dto(&product, category.map(|c| c.name));
        self.cache.set_json(&key, &dto, Some(self.ttl.entity)).await;
        Ok(Some(dto))
    }

    pub async fn by_sku(&self, sku: &str) -> Result<Option<ProductDto>, DomainError> {
        let uow = self.factory.create();
        let Some(product) = uow.products().find_by_sku(sku).await? else {
            return Ok(None);
        };
        let category = uow.categories().find_by_id(&product.category_id).await?;
        Ok(Some(product_to_dto(&product, category.map(|c| c.name))))
    }

    pub async fn by_category(
        &self,
        category_id: &CategoryId,
    ) -> Result<Vec<ProductDto>, DomainError> {
        let uow = self.factory.create();
        let products = uow.products().find_by_category(category_id).await?;
        self.to_dtos(&uow, products).await
    }

    pub async fn active(&self) -> Result<Vec<ProductDto>, DomainError> {
        let uow = self.factory.create();
        let products = uow.products().find_active().await?;
        self.to_dtos(&uow, products).await
    }

    pub async fn by_price_range(
        &self,
        min: &BigDecimal,
        max: &BigDecimal,
    ) -> Result<Vec<ProductDto>, DomainError> {
        let uow = self.factory.create();
        let products = uow.products().find_by_price_range(min, max).await?;
        self.to_dtos(&uow, products).await
    }

    pub async fn low_stock(&self, threshold: i32) -> Result<Vec<ProductDto>, DomainError> {
        let uow = self.factory.create();
        let products = uow.products().find_low_stock(threshold).await?;
        self.to_dtos(&uow, products).await
    }

    pub async fn search(&self, term: &str) -> Result<Vec<ProductDto>, DomainError> {
        let uow = self.factory.create();
        let products = uow.products().search_by_name(term).await?;
        self.to_dtos(&uow, products).await
    }
}

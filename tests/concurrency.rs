//! Racing writers against the store's uniqueness guarantees.

use std::str::FromStr;
use std::sync::Arc;

use bigdecimal::BigDecimal;

use catalog_api::adapters::cache::InMemoryCacheService;
use catalog_api::adapters::memory::{InMemoryStore, InMemoryUnitOfWork, InMemoryUnitOfWorkFactory};
use catalog_api::application::dto::CreateProductRequest;
use catalog_api::application::orchestrators::{CreateProductOrchestrator, Orchestrator};
use catalog_api::domain::catalog::CategoryDraft;
use catalog_api::domain::foundation::CategoryId;
use catalog_api::ports::{UnitOfWork, UnitOfWorkFactory};

async fn seed_category(store: &Arc<InMemoryStore>) -> CategoryId {
    let uow = InMemoryUnitOfWork::new(store.clone());
    uow.categories()
        .insert(&CategoryDraft {
            name: "Electronics".to_string(),
            description: None,
            is_active: true,
        })
        .await
        .unwrap()
        .id
}

fn request(category_id: CategoryId) -> CreateProductRequest {
    CreateProductRequest {
        name: "Widget".to_string(),
        description: None,
        price: BigDecimal::from_str("19.99").unwrap(),
        sku: Some("WID-RACE".to_string()),
        stock_quantity: 1,
        category_id,
    }
}

/// Two concurrent creates with the same SKU may both pass rule validation,
/// but the store's unique constraint lets exactly one of them through.
#[tokio::test]
async fn racing_duplicate_skus_persist_exactly_one_product() {
    let store = InMemoryStore::new();
    let category_id = seed_category(&store).await;
    let factory = InMemoryUnitOfWorkFactory::new(store.clone());
    let cache = Arc::new(InMemoryCacheService::new());

    let left = CreateProductOrchestrator::new(factory.create(), cache.clone());
    let right = CreateProductOrchestrator::new(factory.create(), cache.clone());

    let (a, b) = tokio::join!(
        left.execute(request(category_id)),
        right.execute(request(category_id)),
    );

    let successes = [a.is_success(), b.is_success()]
        .iter()
        .filter(|s| **s)
        .count();
    assert_eq!(successes, 1, "exactly one writer may win the SKU");

    let reader = InMemoryUnitOfWork::new(store);
    let products = reader.products().find_all().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].sku.as_deref(), Some("WID-RACE"));
}

/// The loser's rollback must not disturb the winner's committed row.
#[tokio::test]
async fn sequential_retry_after_losing_the_race_reports_duplicate() {
    let store = InMemoryStore::new();
    let category_id = seed_category(&store).await;
    let factory = InMemoryUnitOfWorkFactory::new(store.clone());
    let cache = Arc::new(InMemoryCacheService::new());

    let winner = CreateProductOrchestrator::new(factory.create(), cache.clone());
    assert!(winner.execute(request(category_id)).await.is_success());

    let retry = CreateProductOrchestrator::new(factory.create(), cache);
    let result = retry.execute(request(category_id)).await;
    let violations = result.violations().expect("retry should fail validation");
    assert_eq!(violations[0].code, "PRODUCT_SKU_DUPLICATE");

    let reader = InMemoryUnitOfWork::new(store);
    assert_eq!(reader.products().find_all().await.unwrap().len(), 1);
}

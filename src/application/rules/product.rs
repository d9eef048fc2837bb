//! Product business rules.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use once_cell::sync::Lazy;

use crate::domain::catalog::ProductDraft;
use crate::domain::foundation::{BusinessRuleResult, ProductId};
use crate::ports::UnitOfWork;

use super::BusinessRule;

static MIN_PRICE: Lazy<BigDecimal> = Lazy::new(|| BigDecimal::from_str("0.01").unwrap());
static MAX_PRICE: Lazy<BigDecimal> = Lazy::new(|| BigDecimal::from_str("999999.99").unwrap());

const MIN_STOCK: i32 = 0;
const MAX_STOCK: i32 = 100_000;

/// The SKU must be present and carried by no other live product.
///
/// Advisory only: the store's unique index is the correctness guarantee
/// under concurrency, this check just produces a friendly early failure.
pub struct ProductSkuMustBeUnique {
    uow: Arc<dyn UnitOfWork>,
    exclude: Option<ProductId>,
}

impl ProductSkuMustBeUnique {
    pub fn new(uow: Arc<dyn UnitOfWork>, exclude: Option<ProductId>) -> Self {
        Self { uow, exclude }
    }
}

#[async_trait]
impl BusinessRule<ProductDraft> for ProductSkuMustBeUnique {
    async fn validate(&self, candidate: &ProductDraft) -> BusinessRuleResult {
        let sku = match candidate.sku.as_deref() {
            Some(s) if !s.trim().is_empty() => s,
            _ => {
                return BusinessRuleResult::fail(
                    "PRODUCT_SKU_EMPTY",
                    "Product SKU cannot be empty",
                );
            }
        };

        match self
            .uow
            .products()
            .is_sku_unique(sku, self.exclude.as_ref())
            .await
        {
            Ok(true) => BusinessRuleResult::pass(),
            Ok(false) => BusinessRuleResult::fail(
                "PRODUCT_SKU_DUPLICATE",
                format!("Product with SKU '{}' already exists", sku),
            ),
            Err(e) => BusinessRuleResult::fail(
                "PRODUCT_SKU_CHECK_FAILED",
                format!("Could not verify SKU uniqueness: {}", e),
            ),
        }
    }
}

/// The referenced category must exist and be active.
pub struct ProductMustHaveValidCategory {
    uow: Arc<dyn UnitOfWork>,
}

impl ProductMustHaveValidCategory {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl BusinessRule<ProductDraft> for ProductMustHaveValidCategory {
    async fn validate(&self, candidate: &ProductDraft) -> BusinessRuleResult {
        let category = match self.uow.categories().find_by_id(&candidate.category_id).await {
            Ok(found) => found,
            Err(e) => {
                return BusinessRuleResult::fail(
                    "PRODUCT_CATEGORY_CHECK_FAILED",
                    format!("Could not verify category: {}", e),
                );
            }
        };

        match category {
            None => BusinessRuleResult::fail(
                "PRODUCT_CATEGORY_NOT_FOUND",
                format!("Category with ID {} does not exist", candidate.category_id),
            ),
            Some(category) if !category.is_active => BusinessRuleResult::fail(
                "PRODUCT_CATEGORY_INACTIVE",
                format!("Category '{}' is not active", category.name),
            ),
            Some(_) => BusinessRuleResult::pass(),
        }
    }
}

/// The price must fall within the acceptable range.
pub struct ProductPriceMustBeValid;

#[async_trait]
impl BusinessRule<ProductDraft> for ProductPriceMustBeValid {
    async fn validate(&self, candidate: &ProductDraft) -> BusinessRuleResult {
        if candidate.price < *MIN_PRICE {
            return BusinessRuleResult::fail(
                "PRODUCT_PRICE_TOO_LOW",
                format!("Product price must be at least {}", *MIN_PRICE),
            );
        }
        if candidate.price > *MAX_PRICE {
            return BusinessRuleResult::fail(
                "PRODUCT_PRICE_TOO_HIGH",
                format!("Product price cannot exceed {}", *MAX_PRICE),
            );
        }
        BusinessRuleResult::pass()
    }
}

/// The stock quantity must fall within the acceptable range.
pub struct ProductStockMustBeValid;

#[async_trait]
impl BusinessRule<ProductDraft> for ProductStockMustBeValid {
    async fn validate(&self, candidate: &ProductDraft) -> BusinessRuleResult {
        if candidate.stock_quantity < MIN_STOCK {
            return BusinessRuleResult::fail(
                "PRODUCT_STOCK_NEGATIVE",
                "Stock quantity cannot be negative",
            );
        }
        if candidate.stock_quantity > MAX_STOCK {
            return BusinessRuleResult::fail(
                "PRODUCT_STOCK_TOO_HIGH",
                format!("Stock quantity cannot exceed {}", MAX_STOCK),
            );
        }
        BusinessRuleResult::pass()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::CategoryId;

    fn draft_with(price: &str, stock: i32) -> ProductDraft {
        ProductDraft {
            name: "Widget".to_string(),
            description: None,
            price: BigDecimal::from_str(price).unwrap(),
            sku: Some("WID-001".to_string()),
            stock_quantity: stock,
            is_active: true,
            category_id: CategoryId::new(),
        }
    }

    #[tokio::test]
    async fn price_below_minimum_fails() {
        let result = ProductPriceMustBeValid.validate(&draft_with("0.00", 1)).await;
        assert_eq!(result.into_violation().unwrap().code, "PRODUCT_PRICE_TOO_LOW");
    }

    #[tokio::test]
    async fn price_above_maximum_fails() {
        let result = ProductPriceMustBeValid
            .validate(&draft_with("1000000.00", 1))
            .await;
        assert_eq!(result.into_violation().unwrap().code, "PRODUCT_PRICE_TOO_HIGH");
    }

    #[tokio::test]
    async fn boundary_prices_pass() {
        assert!(ProductPriceMustBeValid.validate(&draft_with("0.01", 1)).await.is_valid());
        assert!(ProductPriceMustBeValid
            .validate(&draft_with("999999.99", 1))
            .await
            .is_valid());
    }

    #[tokio::test]
    async fn negative_stock_fails() {
        let result = ProductStockMustBeValid.validate(&draft_with("1.00", -1)).await;
        assert_eq!(result.into_violation().unwrap().code, "PRODUCT_STOCK_NEGATIVE");
    }

    #[tokio::test]
    async fn excessive_stock_fails() {
        let result = ProductStockMustBeValid
            .validate(&draft_with("1.00", 100_001))
            .await;
        assert_eq!(result.into_violation().unwrap().code, "PRODUCT_STOCK_TOO_HIGH");
    }

    #[tokio::test]
    async fn stock_bounds_pass() {
        assert!(ProductStockMustBeValid.validate(&draft_with("1.00", 0)).await.is_valid());
        assert!(ProductStockMustBeValid
            .validate(&draft_with("1.00", 100_000))
            .await
            .is_valid());
    }
}

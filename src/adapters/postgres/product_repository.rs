//! Postgres product repository.

use std::sync::Arc;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::catalog::{Product, ProductDraft};
use crate::domain::foundation::{
    AuditFields, CategoryId, DomainError, ErrorCode, ProductId, Timestamp,
};
use crate::ports::ProductRepository;

use super::tx::{contains_pattern, map_sqlx, TxContext};

const COLUMNS: &str = "id, name, description, price, sku, stock_quantity, is_active, \
                       category_id, created_at, updated_at, is_deleted";
const LIVE: &str = "is_deleted = FALSE";

pub struct PgProductRepository {
    ctx: Arc<TxContext>,
}

impl PgProductRepository {
    pub(crate) fn new(ctx: Arc<TxContext>) -> Self {
        Self { ctx }
    }
}

fn row_to_product(row: &PgRow) -> Result<Product, sqlx::Error> {
    let id: Uuid = row.try_get("id")?;
    let category_id: Uuid = row.try_get("category_id")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: Option<DateTime<Utc>> = row.try_get("updated_at")?;
    Ok(Product::reconstitute(
        ProductId::from_uuid(id),
        row.try_get("name")?,
        row.try_get("description")?,
        row.try_get::<BigDecimal, _>("price")?,
        row.try_get("sku")?,
        row.try_get("stock_quantity")?,
        row.try_get("is_active")?,
        CategoryId::from_uuid(category_id),
        AuditFields {
            created_at: Timestamp::from_datetime(created_at),
            updated_at: updated_at.map(Timestamp::from_datetime),
            is_deleted: row.try_get("is_deleted")?,
        },
    ))
}

fn rows_to_products(rows: Vec<PgRow>) -> Result<Vec<Product>, DomainError> {
    rows.iter()
        .map(|row| row_to_product(row).map_err(|e| map_sqlx("Failed to read product row", e)))
        .collect()
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn insert(&self, draft: &ProductDraft) -> Result<Product, DomainError> {
        let row = self
            .ctx
            .fetch_one(
                sqlx::query(
                    "INSERT INTO products \
                     (name, description, price, sku, stock_quantity, is_active, category_id) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7) \
                     RETURNING id, created_at",
                )
                .bind(&draft.name)
                .bind(&draft.description)
                .bind(&draft.price)
                .bind(&draft.sku)
                .bind(draft.stock_quantity)
                .bind(draft.is_active)
                .bind(draft.category_id.as_uuid()),
            )
            .await
            .map_err(|e| map_sqlx("Failed to insert product", e))?;
        self.ctx.note_write(1);

        let id: Uuid = row
            .try_get("id")
            .map_err(|e| map_sqlx("Failed to read inserted product", e))?;
        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| map_sqlx("Failed to read inserted product", e))?;
        Ok(Product::from_draft(
            draft.clone(),
            ProductId::from_uuid(id),
            Timestamp::from_datetime(created_at),
        ))
    }

    async fn update(&self, product: &Product) -> Result<(), DomainError> {
        let sql = format!(
            "UPDATE products SET name = $2, description = $3, price = $4, sku = $5, \
             stock_quantity = $6, is_active = $7, category_id = $8, updated_at = $9 \
             WHERE id = $1 AND {LIVE}"
        );
        let result = self
            .ctx
            .execute(
                sqlx::query(&sql)
                    .bind(product.id.as_uuid())
                    .bind(&product.name)
                    .bind(&product.description)
                    .bind(&product.price)
                    .bind(&product.sku)
                    .bind(product.stock_quantity)
                    .bind(product.is_active)
                    .bind(product.category_id.as_uuid())
                    .bind(product.audit.updated_at.map(|t| *t.as_datetime())),
            )
            .await
            .map_err(|e| map_sqlx("Failed to update product", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ProductNotFound,
                "Product not found",
            ));
        }
        Ok(())
    }

    async fn soft_delete(&self, id: &ProductId) -> Result<(), DomainError> {
        let sql = format!(
            "UPDATE products SET is_deleted = TRUE, updated_at = now() \
             WHERE id = $1 AND {LIVE}"
        );
        let result = self
            .ctx
            .execute(sqlx::query(&sql).bind(id.as_uuid()))
            .await
            .map_err(|e| map_sqlx("Failed to delete product", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ProductNotFound,
                "Product not found",
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        let sql = format!("SELECT {COLUMNS} FROM products WHERE id = $1 AND {LIVE}");
        let row = self
            .ctx
            .fetch_optional(sqlx::query(&sql).bind(id.as_uuid()))
            .await
            .map_err(|e| map_sqlx("Failed to load product", e))?;
        row.as_ref()
            .map(row_to_product)
            .transpose()
            .map_err(|e| map_sqlx("Failed to read product row", e))
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, DomainError> {
        let sql = format!("SELECT {COLUMNS} FROM products WHERE sku = $1 AND {LIVE}");
        let row = self
            .ctx
            .fetch_optional(sqlx::query(&sql).bind(sku))
            .await
            .map_err(|e| map_sqlx("Failed to load product by sku", e))?;
        row.as_ref()
            .map(row_to_product)
            .transpose()
            .map_err(|e| map_sqlx("Failed to read product row", e))
    }

    async fn find_all(&self) -> Result<Vec<Product>, DomainError> {
        let sql = format!("SELECT {COLUMNS} FROM products WHERE {LIVE} ORDER BY name");
        let rows = self
            .ctx
            .fetch_all(sqlx::query(&sql))
            .await
            .map_err(|e| map_sqlx("Failed to list products", e))?;
        rows_to_products(rows)
    }

    async fn find_active(&self) -> Result<Vec<Product>, DomainError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM products WHERE {LIVE} AND is_active = TRUE ORDER BY name"
        );
        let rows = self
            .ctx
            .fetch_all(sqlx::query(&sql))
            .await
            .map_err(|e| map_sqlx("Failed to list active products", e))?;
        rows_to_products(rows)
    }

    async fn find_by_category(
        &self,
        category_id: &CategoryId,
    ) -> Result<Vec<Product>, DomainError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM products WHERE {LIVE} AND category_id = $1 ORDER BY name"
        );
        let rows = self
            .ctx
            .fetch_all(sqlx::query(&sql).bind(category_id.as_uuid()))
            .await
            .map_err(|e| map_sqlx("Failed to list products by category", e))?;
        rows_to_products(rows)
    }

    async fn find_by_price_range(
        &self,
        min: &BigDecimal,
        max: &BigDecimal,
    ) -> Result<Vec<Product>, DomainError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM products \
             WHERE {LIVE} AND price >= $1 AND price <= $2 ORDER BY price"
        );
        let rows = self
            .ctx
            .fetch_all(sqlx::query(&sql).bind(min).bind(max))
            .await
            .map_err(|e| map_sqlx("Failed to list products by price", e))?;
        rows_to_products(rows)
    }

    async fn find_low_stock(&self, threshold: i32) -> Result<Vec<Product>, DomainError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM products \
             WHERE {LIVE} AND stock_quantity <= $1 ORDER BY stock_quantity"
        );
        let rows = self
            .ctx
            .fetch_all(sqlx::query(&sql).bind(threshold))
            .await
            .map_err(|e| map_sqlx("Failed to list low-stock products", e))?;
        rows_to_products(rows)
    }

    async fn search_by_name(&self, term: &str) -> Result<Vec<Product>, DomainError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM products \
             WHERE {LIVE} AND (name ILIKE $1 OR description ILIKE $1) ORDER BY name"
        );
        let rows = self
            .ctx
            .fetch_all(sqlx::query(&sql).bind(contains_pattern(term)))
            .await
            .map_err(|e| map_sqlx("Failed to search products", e))?;
        rows_to_products(rows)
    }

    async fn is_sku_unique(
        &self,
        sku: &str,
        exclude: Option<&ProductId>,
    ) -> Result<bool, DomainError> {
        let sql = format!(
            "SELECT COUNT(*) AS n FROM products \
             WHERE {LIVE} AND sku = $1 AND ($2::uuid IS NULL OR id <> $2)"
        );
        let row = self
            .ctx
            .fetch_one(
                sqlx::query(&sql)
                    .bind(sku)
                    .bind(exclude.map(|id| *id.as_uuid())),
            )
            .await
            .map_err(|e| map_sqlx("Failed to check sku uniqueness", e))?;
        let count: i64 = row
            .try_get("n")
            .map_err(|e| map_sqlx("Failed to check sku uniqueness", e))?;
        Ok(count == 0)
    }
}

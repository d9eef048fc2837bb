//! Postgres category repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::catalog::{Category, CategoryDraft};
use crate::domain::foundation::{AuditFields, CategoryId, DomainError, ErrorCode, Timestamp};
use crate::ports::CategoryRepository;

use super::tx::{contains_pattern, map_sqlx, TxContext};

const COLUMNS: &str = "id, name, description, is_active, created_at, updated_at, is_deleted";
const LIVE: &str = "is_deleted = FALSE";

pub struct PgCategoryRepository {
    ctx: Arc<TxContext>,
}

impl PgCategoryRepository {
    pub(crate) fn new(ctx: Arc<TxContext>) -> Self {
        Self { ctx }
    }
}

fn row_to_category(row: &PgRow) -> Result<Category, sqlx::Error> {
    let id: Uuid = row.try_get("id")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: Option<DateTime<Utc>> = row.try_get("updated_at")?;
    Ok(Category::reconstitute(
        CategoryId::from_uuid(id),
        row.try_get("name")?,
        row.try_get("description")?,
        row.try_get("is_active")?,
        AuditFields {
            created_at: Timestamp::from_datetime(created_at),
            updated_at: updated_at.map(Timestamp::from_datetime),
            is_deleted: row.try_get("is_deleted")?,
        },
    ))
}

fn rows_to_categories(rows: Vec<PgRow>) -> Result<Vec<Category>, DomainError> {
    rows.iter()
        .map(|row| row_to_category(row).map_err(|e| map_sqlx("Failed to read category row", e)))
        .collect()
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn insert(&self, draft: &CategoryDraft) -> Result<Category, DomainError> {
        let row = self
            .ctx
            .fetch_one(
                sqlx::query(
                    "INSERT INTO categories (name, description, is_active) \
                     VALUES ($1, $2, $3) RETURNING id, created_at",
                )
                .bind(&draft.name)
                .bind(&draft.description)
                .bind(draft.is_active),
            )
            .await
            .map_err(|e| map_sqlx("Failed to insert category", e))?;
        self.ctx.note_write(1);

        let id: Uuid = row
            .try_get("id")
            .map_err(|e| map_sqlx("Failed to read inserted category", e))?;
        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| map_sqlx("Failed to read inserted category", e))?;
        Ok(Category::from_draft(
            draft.clone(),
            CategoryId::from_uuid(id),
            Timestamp::from_datetime(created_at),
        ))
    }

    async fn update(&self, category: &Category) -> Result<(), DomainError> {
        let sql = format!(
            "UPDATE categories SET name = $2, description = $3, is_active = $4, \
             updated_at = $5 WHERE id = $1 AND {LIVE}"
        );
        let result = self
            .ctx
            .execute(
                sqlx::query(&sql)
                    .bind(category.id.as_uuid())
                    .bind(&category.name)
                    .bind(&category.description)
                    .bind(category.is_active)
                    .bind(category.audit.updated_at.map(|t| *t.as_datetime())),
            )
            .await
            .map_err(|e| map_sqlx("Failed to update category", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::CategoryNotFound,
                "Category not found",
            ));
        }
        Ok(())
    }

    async fn soft_delete(&self, id: &CategoryId) -> Result<(), DomainError> {
        let sql = format!(
            "UPDATE categories SET is_deleted = TRUE, updated_at = now() \
             WHERE id = $1 AND {LIVE}"
        );
        let result = self
            .ctx
            .execute(sqlx::query(&sql).bind(id.as_uuid()))
            .await
            .map_err(|e| map_sqlx("Failed to delete category", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::CategoryNotFound,
                "Category not found",
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &CategoryId) -> Result<Option<Category>, DomainError> {
        let sql = format!("SELECT {COLUMNS} FROM categories WHERE id = $1 AND {LIVE}");
        let row = self
            .ctx
            .fetch_optional(sqlx::query(&sql).bind(id.as_uuid()))
            .await
            .map_err(|e| map_sqlx("Failed to load category", e))?;
        row.as_ref()
            .map(row_to_category)
            .transpose()
            .map_err(|e| map_sqlx("Failed to read category row", e))
    }

    async fn find_all(&self) -> Result<Vec<Category>, DomainError> {
        let sql = format!("SELECT {COLUMNS} FROM categories WHERE {LIVE} ORDER BY name");
        let rows = self
            .ctx
            .fetch_all(sqlx::query(&sql))
            .await
            .map_err(|e| map_sqlx("Failed to list categories", e))?;
        rows_to_categories(rows)
    }

    async fn find_active(&self) -> Result<Vec<Category>, DomainError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM categories WHERE {LIVE} AND is_active = TRUE ORDER BY name"
        );
        let rows = self
            .ctx
            .fetch_all(sqlx::query(&sql))
            .await
            .map_err(|e| map_sqlx("Failed to list active categories", e))?;
        rows_to_categories(rows)
    }

    async fn search_by_name(&self, term: &str) -> Result<Vec<Category>, DomainError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM categories \
             WHERE {LIVE} AND (name ILIKE $1 OR description ILIKE $1) ORDER BY name"
        );
        let rows = self
            .ctx
            .fetch_all(sqlx::query(&sql).bind(contains_pattern(term)))
            .await
            .map_err(|e| map_sqlx("Failed to search categories", e))?;
        rows_to_categories(rows)
    }

    async fn is_name_unique(
        &self,
        name: &str,
        exclude: Option<&CategoryId>,
    ) -> Result<bool, DomainError> {
        let sql = format!(
            "SELECT COUNT(*) AS n FROM categories \
             WHERE {LIVE} AND name = $1 AND ($2::uuid IS NULL OR id <> $2)"
        );
        let row = self
            .ctx
            .fetch_one(
                sqlx::query(&sql)
                    .bind(name)
                    .bind(exclude.map(|id| *id.as_uuid())),
            )
            .await
            .map_err(|e| map_sqlx("Failed to check name uniqueness", e))?;
        let count: i64 = row
            .try_get("n")
            .map_err(|e| map_sqlx("Failed to check name uniqueness", e))?;
        Ok(count == 0)
    }

    async fn product_count(&self, id: &CategoryId) -> Result<u64, DomainError> {
        let row = self
            .ctx
            .fetch_one(
                sqlx::query(
                    "SELECT COUNT(*) AS n FROM products \
                     WHERE is_deleted = FALSE AND category_id = $1",
                )
                .bind(id.as_uuid()),
            )
            .await
            .map_err(|e| map_sqlx("Failed to count products", e))?;
        let count: i64 = row
            .try_get("n")
            .map_err(|e| map_sqlx("Failed to count products", e))?;
        Ok(count as u64)
    }
}

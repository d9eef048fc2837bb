//! Postgres user repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::foundation::{AuditFields, DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::identity::{User, UserDraft};
use crate::ports::UserRepository;

use super::tx::{map_sqlx, TxContext};

const COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, \
                       is_active, created_at, updated_at, is_deleted";
const LIVE: &str = "is_deleted = FALSE";

pub struct PgUserRepository {
    ctx: Arc<TxContext>,
}

impl PgUserRepository {
    pub(crate) fn new(ctx: Arc<TxContext>) -> Self {
        Self { ctx }
    }

    async fn find_one(&self, sql: &str, value: &str) -> Result<Option<User>, DomainError> {
        let row = self
            .ctx
            .fetch_optional(sqlx::query(sql).bind(value))
            .await
            .map_err(|e| map_sqlx("Failed to load user", e))?;
        row.as_ref()
            .map(row_to_user)
            .transpose()
            .map_err(|e| map_sqlx("Failed to read user row", e))
    }
}

fn row_to_user(row: &PgRow) -> Result<User, sqlx::Error> {
    let id: Uuid = row.try_get("id")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: Option<DateTime<Utc>> = row.try_get("updated_at")?;
    Ok(User::reconstitute(
        UserId::from_uuid(id),
        row.try_get("username")?,
        row.try_get("email")?,
        row.try_get("password_hash")?,
        row.try_get("first_name")?,
        row.try_get("last_name")?,
        row.try_get("is_active")?,
        AuditFields {
            created_at: Timestamp::from_datetime(created_at),
            updated_at: updated_at.map(Timestamp::from_datetime),
            is_deleted: row.try_get("is_deleted")?,
        },
    ))
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, draft: &UserDraft) -> Result<User, DomainError> {
        let row = self
            .ctx
            .fetch_one(
                sqlx::query(
                    "INSERT INTO users \
                     (username, email, password_hash, first_name, last_name, is_active) \
                     VALUES ($1, $2, $3, $4, $5, $6) RETURNING id, created_at",
                )
                .bind(&draft.username)
                .bind(&draft.email)
                .bind(&draft.password_hash)
                .bind(&draft.first_name)
                .bind(&draft.last_name)
                .bind(draft.is_active),
            )
            .await
            .map_err(|e| map_sqlx("Failed to insert user", e))?;
        self.ctx.note_write(1);

        let id: Uuid = row
            .try_get("id")
            .map_err(|e| map_sqlx("Failed to read inserted user", e))?;
        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| map_sqlx("Failed to read inserted user", e))?;
        Ok(User::from_draft(
            draft.clone(),
            UserId::from_uuid(id),
            Timestamp::from_datetime(created_at),
        ))
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let sql = format!(
            "UPDATE users SET username = $2, email = $3, password_hash = $4, \
             first_name = $5, last_name = $6, is_active = $7, updated_at = $8 \
             WHERE id = $1 AND {LIVE}"
        );
        let result = self
            .ctx
            .execute(
                sqlx::query(&sql)
                    .bind(user.id.as_uuid())
                    .bind(&user.username)
                    .bind(&user.email)
                    .bind(&user.password_hash)
                    .bind(&user.first_name)
                    .bind(&user.last_name)
                    .bind(user.is_active)
                    .bind(user.audit.updated_at.map(|t| *t.as_datetime())),
            )
            .await
            .map_err(|e| map_sqlx("Failed to update user", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::UserNotFound, "User not found"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND {LIVE}");
        let row = self
            .ctx
            .fetch_optional(sqlx::query(&sql).bind(id.as_uuid()))
            .await
            .map_err(|e| map_sqlx("Failed to load user", e))?;
        row.as_ref()
            .map(row_to_user)
            .transpose()
            .map_err(|e| map_sqlx("Failed to read user row", e))
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM users WHERE email = $1 AND is_active = TRUE AND {LIVE}"
        );
        self.find_one(&sql, email).await
    }

    async fn find_active_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM users WHERE username = $1 AND is_active = TRUE AND {LIVE}"
        );
        self.find_one(&sql, username).await
    }

    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, DomainError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM users \
             WHERE (email = $1 OR username = $2) AND {LIVE} LIMIT 1"
        );
        let row = self
            .ctx
            .fetch_optional(sqlx::query(&sql).bind(email).bind(username))
            .await
            .map_err(|e| map_sqlx("Failed to load user", e))?;
        row.as_ref()
            .map(row_to_user)
            .transpose()
            .map_err(|e| map_sqlx("Failed to read user row", e))
    }
}

//! Shared transactional context for the Postgres unit of work.
//!
//! Repositories never hold the transaction themselves; they route every
//! statement through this context, which targets the open transaction
//! when one exists and falls back to the pool otherwise. The affected-row
//! counter accumulates across statements until `save_changes` drains it.

use std::sync::atomic::{AtomicU64, Ordering};

use sqlx::postgres::{PgArguments, PgQueryResult, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Transaction};
use tokio::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode};

pub(crate) struct TxContext {
    pool: PgPool,
    tx: Mutex<Option<Transaction<'static, Postgres>>>,
    affected: AtomicU64,
}

impl TxContext {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            tx: Mutex::new(None),
            affected: AtomicU64::new(0),
        }
    }

    pub async fn begin(&self) -> Result<(), DomainError> {
        let mut guard = self.tx.lock().await;
        if guard.is_some() {
            return Err(DomainError::new(
                ErrorCode::TransactionAlreadyOpen,
                "A transaction is already open on this unit of work",
            ));
        }
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database(format!("Failed to begin transaction: {}", e)))?;
        *guard = Some(tx);
        Ok(())
    }

    /// Commits the open transaction. A no-op when none is open.
    pub async fn commit(&self) -> Result<(), DomainError> {
        if let Some(tx) = self.tx.lock().await.take() {
            tx.commit()
                .await
                .map_err(|e| DomainError::database(format!("Failed to commit: {}", e)))?;
        }
        Ok(())
    }

    /// Rolls back the open transaction. A no-op when none is open.
    pub async fn rollback(&self) -> Result<(), DomainError> {
        self.affected.store(0, Ordering::SeqCst);
        if let Some(tx) = self.tx.lock().await.take() {
            tx.rollback()
                .await
                .map_err(|e| DomainError::database(format!("Failed to roll back: {}", e)))?;
        }
        Ok(())
    }

    pub fn take_affected(&self) -> u64 {
        self.affected.swap(0, Ordering::SeqCst)
    }

    /// Records writes performed through RETURNING fetches, which bypass
    /// the `execute` counter.
    pub fn note_write(&self, rows: u64) {
        self.affected.fetch_add(rows, Ordering::SeqCst);
    }

    pub async fn execute(
        &self,
        query: Query<'_, Postgres, PgArguments>,
    ) -> Result<PgQueryResult, sqlx::Error> {
        let mut guard = self.tx.lock().await;
        let result = match guard.as_mut() {
            Some(tx) => query.execute(&mut **tx).await?,
            None => query.execute(&self.pool).await?,
        };
        self.affected
            .fetch_add(result.rows_affected(), Ordering::SeqCst);
        Ok(result)
    }

    pub async fn fetch_optional(
        &self,
        query: Query<'_, Postgres, PgArguments>,
    ) -> Result<Option<PgRow>, sqlx::Error> {
        let mut guard = self.tx.lock().await;
        match guard.as_mut() {
            Some(tx) => query.fetch_optional(&mut **tx).await,
            None => query.fetch_optional(&self.pool).await,
        }
    }

    pub async fn fetch_all(
        &self,
        query: Query<'_, Postgres, PgArguments>,
    ) -> Result<Vec<PgRow>, sqlx::Error> {
        let mut guard = self.tx.lock().await;
        match guard.as_mut() {
            Some(tx) => query.fetch_all(&mut **tx).await,
            None => query.fetch_all(&self.pool).await,
        }
    }

    pub async fn fetch_one(
        &self,
        query: Query<'_, Postgres, PgArguments>,
    ) -> Result<PgRow, sqlx::Error> {
        let mut guard = self.tx.lock().await;
        match guard.as_mut() {
            Some(tx) => query.fetch_one(&mut **tx).await,
            None => query.fetch_one(&self.pool).await,
        }
    }
}

/// Translates a sqlx failure into a domain error, surfacing unique
/// constraint violations (Postgres 23505) as `DuplicateKey`.
pub(crate) fn map_sqlx(context: &str, e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(ref db) = e {
        if db.code().as_deref() == Some("23505") {
            return DomainError::new(
                ErrorCode::DuplicateKey,
                format!("{}: unique constraint violated", context),
            );
        }
    }
    DomainError::database(format!("{}: {}", context, e))
}

/// Builds a contains-style ILIKE pattern, escaping LIKE metacharacters in
/// the user-supplied term so `%` and `_` match themselves.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_pattern_escapes_like_metacharacters() {
        assert_eq!(contains_pattern("solar"), "%solar%");
        assert_eq!(contains_pattern("%"), "%\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("c\\d"), "%c\\\\d%");
    }
}

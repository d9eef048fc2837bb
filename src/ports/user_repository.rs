//! User repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::identity::{User, UserDraft};

/// Repository for user-account persistence and identity lookups.
///
/// Reads exclude soft-deleted rows as a standing contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a draft and returns the persisted user.
    ///
    /// # Errors
    ///
    /// - `DuplicateKey` when the store rejects the email or username
    /// - `DatabaseError` on other persistence failures
    async fn insert(&self, draft: &UserDraft) -> Result<User, DomainError>;

    /// Updates an existing user.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user does not exist (or is deleted)
    async fn update(&self, user: &User) -> Result<(), DomainError>;

    /// Finds a user by id. Returns `None` when absent.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Finds an active user by email. Returns `None` when absent.
    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Finds an active user by username. Returns `None` when absent.
    async fn find_active_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Finds any live user holding either identity, for duplicate checks.
    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn UserRepository) {}
    }
}

//! User account entity.
//!
//! The stored `password_hash` is a PHC-formatted one-way hash; raw secrets
//! never appear on this type. The full entity is what the auth flow caches
//! under its identity keys, so verification can run against a cache hit
//! without touching the store.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuditFields, Timestamp, UserId};

/// A persisted user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub audit: AuditFields,
}

/// Candidate user before the store has assigned an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
}

impl User {
    /// Reconstructs a user from stored fields.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: UserId,
        username: String,
        email: String,
        password_hash: String,
        first_name: Option<String>,
        last_name: Option<String>,
        is_active: bool,
        audit: AuditFields,
    ) -> Self {
        Self {
            id,
            username,
            email,
            password_hash,
            first_name,
            last_name,
            is_active,
            audit,
        }
    }

    /// Builds the persisted form from a draft plus store-assigned identity.
    pub fn from_draft(draft: UserDraft, id: UserId, created_at: Timestamp) -> Self {
        Self {
            id,
            username: draft.username,
            email: draft.email,
            password_hash: draft.password_hash,
            first_name: draft.first_name,
            last_name: draft.last_name,
            is_active: draft.is_active,
            audit: AuditFields::new(created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_draft_carries_hash_untouched() {
        let user = User::from_draft(
            UserDraft {
                username: "user1".to_string(),
                email: "user1@example.com".to_string(),
                password_hash: "$argon2id$stub".to_string(),
                first_name: None,
                last_name: None,
                is_active: true,
            },
            UserId::new(),
            Timestamp::now(),
        );
        assert_eq!(user.password_hash, "$argon2id$stub");
        assert!(user.is_active);
    }
}

//! Category entity and its pre-persistence draft form.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuditFields, CategoryId, Timestamp};

/// A persisted category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub audit: AuditFields,
}

/// Candidate category before the store has assigned an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl Category {
    /// Reconstructs a category from stored fields.
    pub fn reconstitute(
        id: CategoryId,
        name: String,
        description: Option<String>,
        is_active: bool,
        audit: AuditFields,
    ) -> Self {
        Self {
            id,
            name,
            description,
            is_active,
            audit,
        }
    }

    /// Builds the persisted form from a draft plus store-assigned identity.
    pub fn from_draft(draft: CategoryDraft, id: CategoryId, created_at: Timestamp) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            is_active: draft.is_active,
            audit: AuditFields::new(created_at),
        }
    }

    /// Applies an updated draft over this category, touching the audit trail.
    pub fn apply(&mut self, draft: CategoryDraft) {
        self.name = draft.name;
        self.description = draft.description;
        self.is_active = draft.is_active;
        self.audit.touch();
    }

    /// Soft-deletes the category.
    pub fn mark_deleted(&mut self) {
        self.audit.mark_deleted();
    }
}

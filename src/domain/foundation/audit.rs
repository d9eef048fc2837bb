//! Shared audit and soft-delete attributes composed into every entity.

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Identity-independent bookkeeping fields carried by every persisted record.
///
/// Composed into each entity rather than inherited. `updated_at` stays `None`
/// until the first mutation. `is_deleted` marks soft deletion; rows are never
/// physically removed, and every read path filters on it unless the caller
/// explicitly asks for history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFields {
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
    pub is_deleted: bool,
}

impl AuditFields {
    /// Audit fields for a freshly created record.
    pub fn new(created_at: Timestamp) -> Self {
        Self {
            created_at,
            updated_at: None,
            is_deleted: false,
        }
    }

    /// Marks the record as mutated now.
    pub fn touch(&mut self) {
        self.updated_at = Some(Timestamp::now());
    }

    /// Marks the record soft-deleted and records the mutation time.
    pub fn mark_deleted(&mut self) {
        self.is_deleted = true;
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_has_no_update_and_is_live() {
        let audit = AuditFields::new(Timestamp::now());
        assert!(audit.updated_at.is_none());
        assert!(!audit.is_deleted);
    }

    #[test]
    fn touch_sets_updated_at() {
        let mut audit = AuditFields::new(Timestamp::now());
        audit.touch();
        assert!(audit.updated_at.is_some());
    }

    #[test]
    fn mark_deleted_sets_flag_and_updated_at() {
        let mut audit = AuditFields::new(Timestamp::now());
        audit.mark_deleted();
        assert!(audit.is_deleted);
        assert!(audit.updated_at.is_some());
    }
}

//! Product entity and its pre-persistence draft form.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuditFields, CategoryId, ProductId, Timestamp};

/// A persisted product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub sku: Option<String>,
    pub stock_quantity: i32,
    pub is_active: bool,
    pub category_id: CategoryId,
    pub audit: AuditFields,
}

/// Candidate product before the store has assigned an id.
///
/// Business rules validate the draft; the repository insert turns it into a
/// [`Product`] with the store-assigned id and creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub sku: Option<String>,
    pub stock_quantity: i32,
    pub is_active: bool,
    pub category_id: CategoryId,
}

impl Product {
    /// Reconstructs a product from stored fields.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ProductId,
        name: String,
        description: Option<String>,
        price: BigDecimal,
        sku: Option<String>,
        stock_quantity: i32,
        is_active: bool,
        category_id: CategoryId,
        audit: AuditFields,
    ) -> Self {
        Self {
            id,
            name,
            description,
            price,
            sku,
            stock_quantity,
            is_active,
            category_id,
            audit,
        }
    }

    /// Builds the persisted form from a draft plus store-assigned identity.
    pub fn from_draft(draft: ProductDraft, id: ProductId, created_at: Timestamp) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            sku: draft.sku,
            stock_quantity: draft.stock_quantity,
            is_active: draft.is_active,
            category_id: draft.category_id,
            audit: AuditFields::new(created_at),
        }
    }

    /// Applies an updated draft over this product, touching the audit trail.
    pub fn apply(&mut self, draft: ProductDraft) {
        self.name = draft.name;
        self.description = draft.description;
        self.price = draft.price;
        self.sku = draft.sku;
        self.stock_quantity = draft.stock_quantity;
        self.is_active = draft.is_active;
        self.category_id = draft.category_id;
        self.audit.touch();
    }

    /// Soft-deletes the product.
    pub fn mark_deleted(&mut self) {
        self.audit.mark_deleted();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Widget".to_string(),
            description: None,
            price: BigDecimal::from_str("9.99").unwrap(),
            sku: Some("WID-001".to_string()),
            stock_quantity: 5,
            is_active: true,
            category_id: CategoryId::new(),
        }
    }

    #[test]
    fn from_draft_starts_unmodified() {
        let product = Product::from_draft(draft(), ProductId::new(), Timestamp::now());
        assert!(product.audit.updated_at.is_none());
        assert!(!product.audit.is_deleted);
    }

    #[test]
    fn apply_touches_updated_at() {
        let mut product = Product::from_draft(draft(), ProductId::new(), Timestamp::now());
        let mut updated = draft();
        updated.name = "Widget v2".to_string();
        product.apply(updated);
        assert_eq!(product.name, "Widget v2");
        assert!(product.audit.updated_at.is_some());
    }

    #[test]
    fn mark_deleted_is_soft() {
        let mut product = Product::from_draft(draft(), ProductId::new(), Timestamp::now());
        product.mark_deleted();
        assert!(product.audit.is_deleted);
    }
}

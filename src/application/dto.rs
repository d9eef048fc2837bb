//! Data-transfer shapes and the single entity→DTO mapping module.
//!
//! Every orchestrator and query maps through these functions rather than
//! carrying its own field-by-field copy of the mapping.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::{Category, CategoryDraft, Product, ProductDraft};
use crate::domain::foundation::{CategoryId, ProductId, Timestamp, UserId};
use crate::domain::identity::User;

/// Outward-facing product representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDto {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub sku: Option<String>,
    pub stock_quantity: i32,
    pub is_active: bool,
    pub category_id: CategoryId,
    /// Denormalized for display; populated when the category was loaded.
    pub category_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

/// Outward-facing category representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDto {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

/// Outward-facing user representation. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// Input for product creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub sku: Option<String>,
    pub stock_quantity: i32,
    pub category_id: CategoryId,
}

/// Input for product update; replaces all mutable fields.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProductRequest {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub sku: Option<String>,
    pub stock_quantity: i32,
    pub category_id: CategoryId,
}

/// Input for category creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Input for category update.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCategoryRequest {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

/// Maps a product and its (optionally loaded) category name to the DTO.
pub fn product_to_dto(product: &Product, category_name: Option<String>) -> ProductDto {
    ProductDto {
        id: product.id,
        name: product.name.clone(),
        description: product.description.clone(),
        price: product.price.clone(),
        sku: product.sku.clone(),
        stock_quantity: product.stock_quantity,
        is_active: product.is_active,
        category_id: product.category_id,
        category_name,
        created_at: product.audit.created_at,
        updated_at: product.audit.updated_at,
    }
}

pub fn category_to_dto(category: &Category) -> CategoryDto {
    CategoryDto {
        id: category.id,
        name: category.name.clone(),
        description: category.description.clone(),
        is_active: category.is_active,
        created_at: category.audit.created_at,
        updated_at: category.audit.updated_at,
    }
}

pub fn user_to_dto(user: &User) -> UserDto {
    UserDto {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        is_active: user.is_active,
        created_at: user.audit.created_at,
    }
}

impl CreateProductRequest {
    /// Builds the candidate entity. New products start active.
    pub fn into_draft(self) -> ProductDraft {
        ProductDraft {
            name: self.name,
            description: self.description,
            price: self.price,
            sku: self.sku,
            stock_quantity: self.stock_quantity,
            is_active: true,
            category_id: self.category_id,
        }
    }
}

impl UpdateProductRequest {
    /// Builds the replacement field set, preserving active status handling
    /// at the orchestrator.
    pub fn to_draft(&self, is_active: bool) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price.clone(),
            sku: self.sku.clone(),
            stock_quantity: self.stock_quantity,
            is_active,
            category_id: self.category_id,
        }
    }
}

impl CreateCategoryRequest {
    /// Builds the candidate entity. New categories start active.
    pub fn into_draft(self) -> CategoryDraft {
        CategoryDraft {
            name: self.name,
            description: self.description,
            is_active: true,
        }
    }
}

impl UpdateCategoryRequest {
    pub fn to_draft(&self) -> CategoryDraft {
        CategoryDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            is_active: self.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::AuditFields;
    use std::str::FromStr;

    #[test]
    fn user_dto_never_exposes_password_hash() {
        let user = User::reconstitute(
            UserId::new(),
            "user1".to_string(),
            "user1@example.com".to_string(),
            "$argon2id$secret".to_string(),
            None,
            None,
            true,
            AuditFields::new(Timestamp::now()),
        );
        let json = serde_json::to_string(&user_to_dto(&user)).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("user1@example.com"));
    }

    #[test]
    fn product_dto_carries_denormalized_category_name() {
        let product = Product::from_draft(
            ProductDraft {
                name: "Widget".to_string(),
                description: None,
                price: BigDecimal::from_str("2.50").unwrap(),
                sku: Some("WID".to_string()),
                stock_quantity: 1,
                is_active: true,
                category_id: CategoryId::new(),
            },
            ProductId::new(),
            Timestamp::now(),
        );
        let dto = product_to_dto(&product, Some("Tools".to_string()));
        assert_eq!(dto.category_name.as_deref(), Some("Tools"));
    }
}

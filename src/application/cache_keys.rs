//! Cache key vocabulary.
//!
//! Every key and invalidation pattern the application uses lives here, so
//! the populate side and the invalidate side cannot drift apart.

use crate::domain::foundation::{CategoryId, ProductId, UserId};

/// Pattern clearing the product list keys.
pub const PRODUCTS_PATTERN: &str = "products:*";

/// Pattern clearing the category list keys.
pub const CATEGORIES_PATTERN: &str = "categories:*";

/// Pattern clearing every key in the namespace. This is the clear-all
/// contract of the cache-admin surface; nothing on the write path may use
/// it, since orchestrators invalidate only what they touched.
pub const ALL_PATTERN: &str = "*";

pub fn all_products() -> String {
    "products:all".to_string()
}

pub fn product_by_id(id: &ProductId) -> String {
    format!("product:{}", id)
}

pub fn all_categories() -> String {
    "categories:all".to_string()
}

pub fn active_categories() -> String {
    "categories:active".to_string()
}

pub fn category_by_id(id: &CategoryId) -> String {
    format!("category:{}", id)
}

pub fn user_by_email(email: &str) -> String {
    format!("user:{}", email)
}

pub fn user_by_username(username: &str) -> String {
    format!("user_by_username:{}", username)
}

pub fn user_by_id(id: &UserId) -> String {
    format!("user:{}", id)
}

pub fn token_for_user(id: &UserId) -> String {
    format!("token:{}", id)
}

pub fn valid_token(digest: &str) -> String {
    format!("valid_token:{}", digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_keys_fall_under_their_pattern() {
        // The coarse patterns must actually cover the list keys they are
        // meant to invalidate.
        assert!(all_products().starts_with("products:"));
        assert!(all_categories().starts_with("categories:"));
        assert!(active_categories().starts_with("categories:"));
    }

    #[test]
    fn identity_keys_are_distinct_per_lookup_axis() {
        let id = UserId::new();
        assert_ne!(user_by_email("a@b.c"), user_by_username("a@b.c"));
        assert_ne!(user_by_id(&id), token_for_user(&id));
    }
}

//! Catalog domain - products and the categories that own them.

mod category;
mod product;

pub use category::{Category, CategoryDraft};
pub use product::{Product, ProductDraft};

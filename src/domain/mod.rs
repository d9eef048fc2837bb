//! Domain layer - entities and shared primitives.

pub mod catalog;
pub mod foundation;
pub mod identity;

//! Catalog API - transactional product catalog with cache-aside reads
//!
//! This crate implements a unit-of-work write path guarded by composable
//! business rules, a fail-open Redis cache layer with pattern
//! invalidation, and a token-based authentication flow with multi-key
//! identity caching.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;

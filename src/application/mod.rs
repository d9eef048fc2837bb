//! Application layer: orchestrated writes, cached reads, authentication.

pub mod auth;
pub mod cache_keys;
pub mod dto;
pub mod orchestrators;
pub mod queries;
pub mod rules;

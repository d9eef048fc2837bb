//! Adapters implementing the ports against concrete infrastructure.

pub mod auth;
pub mod cache;
pub mod memory;
pub mod postgres;

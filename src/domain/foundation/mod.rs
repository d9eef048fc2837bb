//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, value objects, audit attributes, and the result
//! types that form the vocabulary of the catalog domain.

mod audit;
mod errors;
mod ids;
mod result;
mod rule;
mod timestamp;

pub use audit::AuditFields;
pub use errors::{DomainError, ErrorCode};
pub use ids::{CategoryId, ProductId, UserId};
pub use result::OrchestratorResult;
pub use rule::{BusinessRuleResult, RuleViolation};
pub use timestamp::Timestamp;

//! Write-path orchestrators.
//!
//! Each orchestrator owns one mutation and runs the same sequence: map the
//! request to a draft, evaluate the business rules, and only if every rule
//! passes open a transaction, perform the writes, flush, commit and finally
//! invalidate the affected cache region. Rule failures never touch the
//! store; persistence failures roll the transaction back and surface as
//! [`OrchestratorResult::Failure`].

use async_trait::async_trait;

use crate::domain::foundation::OrchestratorResult;

mod create_category;
mod create_product;
mod delete_category;
mod delete_product;
mod update_category;
mod update_product;

pub use create_category::CreateCategoryOrchestrator;
pub use create_product::CreateProductOrchestrator;
pub use delete_category::DeleteCategoryOrchestrator;
pub use delete_product::DeleteProductOrchestrator;
pub use update_category::UpdateCategoryOrchestrator;
pub use update_product::UpdateProductOrchestrator;

/// A single validated, transactional mutation.
#[async_trait]
pub trait Orchestrator<I, O>: Send + Sync {
    async fn execute(&self, input: I) -> OrchestratorResult<O>;
}

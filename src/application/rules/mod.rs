//! Business-rule engine.
//!
//! A rule is a read-only async predicate over a candidate entity. Rules
//! constructed with a unit of work observe the same transactional context
//! as the orchestrator that owns them.
//!
//! # Composition policy
//!
//! [`evaluate_all`] runs every rule in declaration order and aggregates all
//! violations. It never short-circuits: the caller gets the complete list
//! of problems in one response, not just the first.

mod category;
mod product;

pub use category::{CategoryCannotBeDeletedWithProducts, CategoryNameMustBeUnique};
pub use product::{
    ProductMustHaveValidCategory, ProductPriceMustBeValid, ProductSkuMustBeUnique,
    ProductStockMustBeValid,
};

use async_trait::async_trait;

use crate::domain::foundation::{BusinessRuleResult, RuleViolation};

/// A composable validation predicate over a candidate entity.
///
/// Rules must not mutate the candidate and must not write to the store;
/// they exist to report, not to act.
#[async_trait]
pub trait BusinessRule<T: Sync>: Send + Sync {
    async fn validate(&self, candidate: &T) -> BusinessRuleResult;
}

/// Evaluates every rule against the candidate and collects all violations,
/// preserving declaration order.
pub async fn evaluate_all<T: Sync>(
    rules: &[Box<dyn BusinessRule<T>>],
    candidate: &T,
) -> Vec<RuleViolation> {
    let mut violations = Vec::new();
    for rule in rules {
        if let Some(violation) = rule.validate(candidate).await.into_violation() {
            violations.push(violation);
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysPass;
    struct AlwaysFail(&'static str);

    #[async_trait]
    impl BusinessRule<u32> for AlwaysPass {
        async fn validate(&self, _candidate: &u32) -> BusinessRuleResult {
            BusinessRuleResult::pass()
        }
    }

    #[async_trait]
    impl BusinessRule<u32> for AlwaysFail {
        async fn validate(&self, _candidate: &u32) -> BusinessRuleResult {
            BusinessRuleResult::fail(self.0, format!("{} failed", self.0))
        }
    }

    #[tokio::test]
    async fn evaluate_all_returns_empty_when_all_pass() {
        let rules: Vec<Box<dyn BusinessRule<u32>>> = vec![Box::new(AlwaysPass), Box::new(AlwaysPass)];
        assert!(evaluate_all(&rules, &1).await.is_empty());
    }

    #[tokio::test]
    async fn evaluate_all_runs_every_rule_despite_failures() {
        let rules: Vec<Box<dyn BusinessRule<u32>>> = vec![
            Box::new(AlwaysFail("FIRST")),
            Box::new(AlwaysPass),
            Box::new(AlwaysFail("SECOND")),
        ];
        let violations = evaluate_all(&rules, &1).await;
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].code, "FIRST");
        assert_eq!(violations[1].code, "SECOND");
    }
}

//! Business-rule outcome types.

use serde::{Deserialize, Serialize};

/// A single violated rule: machine-readable code plus a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub code: String,
    pub message: String,
}

impl RuleViolation {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Outcome of a single business-rule evaluation.
///
/// A failing result always carries a code; a passing one carries nothing.
/// The enum makes "error code present only on failure" structural.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusinessRuleResult {
    Pass,
    Fail(RuleViolation),
}

impl BusinessRuleResult {
    /// A passing result.
    pub fn pass() -> Self {
        BusinessRuleResult::Pass
    }

    /// A failing result with the given code and message.
    pub fn fail(code: impl Into<String>, message: impl Into<String>) -> Self {
        BusinessRuleResult::Fail(RuleViolation::new(code, message))
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, BusinessRuleResult::Pass)
    }

    /// Returns the violation if the rule failed.
    pub fn into_violation(self) -> Option<RuleViolation> {
        match self {
            BusinessRuleResult::Pass => None,
            BusinessRuleResult::Fail(v) => Some(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_is_valid_and_carries_nothing() {
        let result = BusinessRuleResult::pass();
        assert!(result.is_valid());
        assert!(result.into_violation().is_none());
    }

    #[test]
    fn fail_carries_code_and_message() {
        let result = BusinessRuleResult::fail("PRODUCT_SKU_EMPTY", "Product SKU cannot be empty");
        assert!(!result.is_valid());
        let violation = result.into_violation().unwrap();
        assert_eq!(violation.code, "PRODUCT_SKU_EMPTY");
        assert_eq!(violation.message, "Product SKU cannot be empty");
    }

    #[test]
    fn violation_displays_code_and_message() {
        let v = RuleViolation::new("CATEGORY_HAS_PRODUCTS", "Cannot delete");
        assert_eq!(format!("{}", v), "[CATEGORY_HAS_PRODUCTS] Cannot delete");
    }
}

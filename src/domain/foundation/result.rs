//! Orchestrator result type.

use super::RuleViolation;

/// Outcome of one orchestrated business operation.
///
/// Exactly one of the three shapes holds:
/// - `Success` carries the operation's output.
/// - `ValidationFailure` carries every violated rule, in evaluation order,
///   and implies no write was attempted.
/// - `Failure` carries a single summarized message for a terminal error
///   after validation passed (the transaction was rolled back).
#[derive(Debug, Clone, PartialEq)]
pub enum OrchestratorResult<T> {
    Success(T),
    ValidationFailure(Vec<RuleViolation>),
    Failure(String),
}

impl<T> OrchestratorResult<T> {
    /// Builds a validation failure from accumulated violations.
    ///
    /// The list must be non-empty; an empty list is a caller bug and is
    /// reported as an internal failure rather than a silent success.
    pub fn validation_failure(violations: Vec<RuleViolation>) -> Self {
        if violations.is_empty() {
            return OrchestratorResult::Failure(
                "Validation failure reported without violations".to_string(),
            );
        }
        OrchestratorResult::ValidationFailure(violations)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OrchestratorResult::Success(_))
    }

    /// Returns the output for a successful result.
    pub fn into_success(self) -> Option<T> {
        match self {
            OrchestratorResult::Success(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the violations for a validation failure.
    pub fn violations(&self) -> Option<&[RuleViolation]> {
        match self {
            OrchestratorResult::ValidationFailure(v) => Some(v),
            _ => None,
        }
    }

    /// Maps the success payload, leaving failures untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OrchestratorResult<U> {
        match self {
            OrchestratorResult::Success(data) => OrchestratorResult::Success(f(data)),
            OrchestratorResult::ValidationFailure(v) => OrchestratorResult::ValidationFailure(v),
            OrchestratorResult::Failure(msg) => OrchestratorResult::Failure(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_holds_only_data() {
        let result = OrchestratorResult::Success(42);
        assert!(result.is_success());
        assert!(result.violations().is_none());
        assert_eq!(result.into_success(), Some(42));
    }

    #[test]
    fn validation_failure_requires_violations() {
        let result: OrchestratorResult<()> = OrchestratorResult::validation_failure(vec![]);
        assert!(matches!(result, OrchestratorResult::Failure(_)));
    }

    #[test]
    fn validation_failure_preserves_order() {
        let violations = vec![
            RuleViolation::new("A", "first"),
            RuleViolation::new("B", "second"),
        ];
        let result: OrchestratorResult<()> =
            OrchestratorResult::validation_failure(violations.clone());
        assert_eq!(result.violations().unwrap(), violations.as_slice());
    }

    #[test]
    fn map_transforms_success_only() {
        let ok = OrchestratorResult::Success(2).map(|n| n * 10);
        assert_eq!(ok.into_success(), Some(20));

        let failed: OrchestratorResult<i32> = OrchestratorResult::Failure("boom".into());
        assert!(matches!(failed.map(|n| n * 10), OrchestratorResult::Failure(m) if m == "boom"));
    }
}

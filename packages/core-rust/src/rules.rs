//! Business rule evaluation.
//!
//! A broken business rule is not a validation failure: it signals that the
//! requested state change violates a domain invariant. It escapes the
//! [`Outcome`](crate::Outcome) channel as a [`BusinessRuleViolation`] and is
//! rendered as a conflict at the API boundary.

/// A stateless domain invariant check.
pub trait BusinessRule {
    fn is_met(&self) -> bool;

    /// Message reported when the rule is not met.
    fn error_message(&self) -> String;
}

/// Raised when a [`BusinessRule`] is not met.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BusinessRuleViolation {
    message: String,
}

impl BusinessRuleViolation {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Evaluates `rule` once.
///
/// # Errors
///
/// Returns [`BusinessRuleViolation`] carrying the rule's message when the rule
/// is not met.
pub fn validate(rule: &dyn BusinessRule) -> Result<(), BusinessRuleViolation> {
    if rule.is_met() {
        Ok(())
    } else {
        Err(BusinessRuleViolation::new(rule.error_message()))
    }
}

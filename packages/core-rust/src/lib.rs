//! Recruitly Core: result/error model, business rules, tenant context, and request contracts.

pub mod context;
pub mod error;
pub mod outcome;
pub mod rules;
pub mod traits;

pub use context::{TenantContext, TENANT_ID_HEADER};
pub use error::{Error, ErrorKind, ValidationError};
pub use outcome::Outcome;
pub use rules::{BusinessRule, BusinessRuleViolation};
pub use traits::{Request, RequestKind};

#[cfg(test)]
mod tests {
    #[test]
    fn crate_loads() {
        // Empty body: if this test runs, the crate compiles and loads.
    }
}

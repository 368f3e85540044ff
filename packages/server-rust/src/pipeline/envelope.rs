//! Values that travel through the request pipeline.

use recruitly_core::{BusinessRuleViolation, Request, TenantContext, TENANT_ID_HEADER};
use tokio_util::sync::CancellationToken;

use super::identity::request_name;

/// Per-request state threaded through every behavior and the handler.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    tenant: TenantContext,
    cancellation: CancellationToken,
}

impl RequestContext {
    #[must_use]
    pub fn new(tenant: TenantContext, cancellation: CancellationToken) -> Self {
        Self {
            tenant,
            cancellation,
        }
    }

    /// A context for `tenant` with a fresh, never-cancelled token.
    #[must_use]
    pub fn for_tenant(tenant: TenantContext) -> Self {
        Self::new(tenant, CancellationToken::new())
    }

    #[must_use]
    pub fn tenant(&self) -> &TenantContext {
        &self.tenant
    }

    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }
}

/// A request together with its context, as seen by the tower stack.
#[derive(Debug)]
pub struct Envelope<R> {
    pub request: R,
    pub ctx: RequestContext,
}

impl<R: Request> Envelope<R> {
    #[must_use]
    pub fn new(request: R, ctx: RequestContext) -> Self {
        Self { request, ctx }
    }
}

/// Faults that escape the outcome channel.
///
/// Handlers report expected failures as `Outcome` failures. A fault aborts the
/// pipeline instead and is translated once, at the API boundary.
#[derive(Debug, thiserror::Error)]
pub enum PipelineFault {
    #[error("{message}")]
    TenantNotResolved { message: String },
    #[error(transparent)]
    BusinessRule(#[from] BusinessRuleViolation),
    #[error("no handler registered for request {request}")]
    HandlerNotRegistered { request: &'static str },
    #[error("request {request} was cancelled")]
    Cancelled { request: &'static str },
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl PipelineFault {
    /// The fault raised when a tenant-scoped request arrives without a tenant.
    #[must_use]
    pub fn tenant_not_resolved<R: Request>() -> Self {
        Self::TenantNotResolved {
            message: format!(
                "Request '{}' requires a tenant context, but no tenant was resolved. \
                 Ensure the '{TENANT_ID_HEADER}' header is provided in the request.",
                request_name::<R>()
            ),
        }
    }

    #[must_use]
    pub fn cancelled<R: Request>() -> Self {
        Self::Cancelled {
            request: request_name::<R>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ArchiveVacancy;

    impl Request for ArchiveVacancy {
        type Output = ();
        const TENANT_SCOPED: bool = true;
    }

    #[test]
    fn tenant_not_resolved_names_request_and_header() {
        let fault = PipelineFault::tenant_not_resolved::<ArchiveVacancy>();
        assert_eq!(
            fault.to_string(),
            "Request 'ArchiveVacancy' requires a tenant context, but no tenant was resolved. \
             Ensure the 'X-Tenant-Id' header is provided in the request."
        );
    }

    #[test]
    fn business_rule_converts_with_question_mark() {
        fn check() -> Result<(), PipelineFault> {
            let rule: Result<(), BusinessRuleViolation> =
                Err(BusinessRuleViolation::new("Vacancy is already closed"));
            rule?;
            Ok(())
        }

        let fault = check().unwrap_err();
        assert!(matches!(fault, PipelineFault::BusinessRule(_)));
        assert_eq!(fault.to_string(), "Vacancy is already closed");
    }

    #[test]
    fn default_context_is_unresolved_and_live() {
        let ctx = RequestContext::default();
        assert!(!ctx.tenant().has_tenant());
        assert!(!ctx.cancellation().is_cancelled());
    }

    #[test]
    fn cancelled_names_request() {
        let fault = PipelineFault::cancelled::<ArchiveVacancy>();
        assert_eq!(fault.to_string(), "request ArchiveVacancy was cancelled");
    }
}

//! Tenant validation behavior.
//!
//! Rejects tenant-scoped requests whose context has no resolved tenant with
//! `PipelineFault::TenantNotResolved`, before any inner stage runs.

use std::task::{Context, Poll};

use recruitly_core::{Outcome, Request};
use tower::{Layer, Service};

use crate::pipeline::envelope::{Envelope, PipelineFault};
use crate::pipeline::handler::PipelineFuture;

// ---------------------------------------------------------------------------
// TenantValidationLayer
// ---------------------------------------------------------------------------

/// Tower layer that enforces the tenant precondition of tenant-scoped requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct TenantValidationLayer;

impl<S> Layer<S> for TenantValidationLayer {
    type Service = TenantValidationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TenantValidationService { inner }
    }
}

// ---------------------------------------------------------------------------
// TenantValidationService
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TenantValidationService<S> {
    inner: S,
}

impl<R, S> Service<Envelope<R>> for TenantValidationService<S>
where
    R: Request,
    S: Service<Envelope<R>, Response = Outcome<R::Output>, Error = PipelineFault> + Send,
    S::Future: Send + 'static,
{
    type Response = Outcome<R::Output>;
    type Error = PipelineFault;
    type Future = PipelineFuture<R::Output>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, envelope: Envelope<R>) -> Self::Future {
        if R::TENANT_SCOPED && !envelope.ctx.tenant().has_tenant() {
            let fault = PipelineFault::tenant_not_resolved::<R>();
            return Box::pin(async move { Err(fault) });
        }
        Box::pin(self.inner.call(envelope))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

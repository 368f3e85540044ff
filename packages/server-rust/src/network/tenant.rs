//! Inbound tenant resolution.
//!
//! The tenant id is read once from the `X-Tenant-Id` header and cached in the
//! request's extensions. Handlers and the pipeline read it back through
//! [`tenant_context`] or the [`Tenant`] extractor.

use std::convert::Infallible;
use std::task::{Context, Poll};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap, Request};
use recruitly_core::{TenantContext, TENANT_ID_HEADER};
use tower::{Layer, Service};
use tracing::trace;

/// Request-extension entry holding the resolved tenant id.
#[derive(Debug, Clone)]
struct ResolvedTenant(String);

/// Resolves the tenant of a request from its headers into its extensions.
///
/// Only a present, non-blank header resolves the tenant. Once resolved, later
/// calls leave the cached value untouched.
pub fn resolve_tenant(headers: &HeaderMap, extensions: &mut Extensions) {
    if extensions.get::<ResolvedTenant>().is_some() {
        return;
    }

    let Some(tenant_id) = headers
        .get(TENANT_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
    else {
        return;
    };

    trace!(tenant_id, "tenant resolved");
    extensions.insert(ResolvedTenant(tenant_id.to_owned()));
}

/// The tenant context cached on a request, unresolved if none was stored.
#[must_use]
pub fn tenant_context(extensions: &Extensions) -> TenantContext {
    extensions
        .get::<ResolvedTenant>()
        .map_or_else(TenantContext::unresolved, |t| TenantContext::resolved(t.0.clone()))
}

// ---------------------------------------------------------------------------
// TenantResolutionLayer
// ---------------------------------------------------------------------------

/// Tower layer that runs [`resolve_tenant`] on every inbound request.
#[derive(Debug, Clone, Copy, Default)]
pub struct TenantResolutionLayer;

impl<S> Layer<S> for TenantResolutionLayer {
    type Service = TenantResolutionService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TenantResolutionService { inner }
    }
}

#[derive(Debug, Clone)]
pub struct TenantResolutionService<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for TenantResolutionService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        let (mut parts, body) = request.into_parts();
        resolve_tenant(&parts.headers, &mut parts.extensions);
        self.inner.call(Request::from_parts(parts, body))
    }
}

// ---------------------------------------------------------------------------
// Tenant extractor
// ---------------------------------------------------------------------------

/// Axum extractor for the request's [`TenantContext`]. Never rejects: a
/// request without a tenant yields an unresolved context.
#[derive(Debug, Clone)]
pub struct Tenant(pub TenantContext);

impl<S: Send + Sync> FromRequestParts<S> for Tenant {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(tenant_context(&parts.extensions)))
    }
}

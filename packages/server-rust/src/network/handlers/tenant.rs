//! Tenant diagnostics endpoint, served through the mediator pipeline.

use async_trait::async_trait;
use axum::extract::State;
use axum::response::Response;
use recruitly_core::{Outcome, Request, RequestKind};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::AppState;
use crate::network::tenant::Tenant;
use crate::pipeline::{PipelineFault, RequestContext, RequestHandler};
use crate::problem::into_api_response;

/// Query returning the tenant the current request was resolved to.
#[derive(Debug)]
pub struct CurrentTenant;

impl Request for CurrentTenant {
    type Output = TenantInfo;
    const KIND: RequestKind = RequestKind::Query;
    const TENANT_SCOPED: bool = true;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantInfo {
    pub tenant_id: String,
}

pub struct CurrentTenantHandler;

#[async_trait]
impl RequestHandler<CurrentTenant> for CurrentTenantHandler {
    async fn handle(
        &self,
        _request: CurrentTenant,
        ctx: &RequestContext,
    ) -> Result<Outcome<TenantInfo>, PipelineFault> {
        Ok(Outcome::from_nullable(ctx.tenant().tenant_id().map(|id| TenantInfo {
            tenant_id: id.to_owned(),
        })))
    }
}

/// `GET /tenant`
pub async fn current_tenant_handler(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
) -> Response {
    let ctx = RequestContext::new(tenant, CancellationToken::new());
    into_api_response(state.mediator.send(CurrentTenant, ctx).await)
}

//! End-to-end: request -> behaviors -> handler -> problem document.

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{Request as HttpRequest, StatusCode};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use recruitly_core::{Error, Outcome, Request, RequestKind, TenantContext};
use recruitly_server::network::handlers::{CurrentTenant, CurrentTenantHandler};
use recruitly_server::network::middleware::build_http_layers;
use recruitly_server::network::{NetworkConfig, Tenant};
use recruitly_server::pipeline::{
    validator_fn, Mediator, PipelineFault, RequestContext, RequestHandler,
};
use recruitly_server::problem::{into_api_response, ProblemDetails, APPLICATION_PROBLEM_JSON};
use serde_json::Value;
use tower::ServiceExt;

struct GetOrder {
    id: u32,
}

impl Request for GetOrder {
    type Output = String;
    const KIND: RequestKind = RequestKind::Query;
    const TENANT_SCOPED: bool = true;
}

struct OrderLookup;

#[async_trait]
impl RequestHandler<GetOrder> for OrderLookup {
    async fn handle(
        &self,
        request: GetOrder,
        ctx: &RequestContext,
    ) -> Result<Outcome<String>, PipelineFault> {
        if request.id == 1 {
            let tenant = ctx.tenant().tenant_id().unwrap_or_default();
            return Ok(Outcome::success(format!("{tenant}/order-1")));
        }
        Ok(Outcome::failure(Error::not_found(
            "Order.Missing",
            format!("Order {} not found", request.id),
        )))
    }
}

fn mediator() -> Mediator {
    Mediator::builder()
        .register::<GetOrder, _>(OrderLookup)
        .register::<CurrentTenant, _>(CurrentTenantHandler)
        .validate_with::<GetOrder, _>(validator_fn(|request: &GetOrder| {
            if request.id == 0 {
                vec![Error::validation("Id", "Order id must be positive")]
            } else {
                Vec::new()
            }
        }))
        .require::<GetOrder>()
        .build()
        .unwrap()
}

async fn get_order(
    State(mediator): State<Mediator>,
    Tenant(tenant): Tenant,
    Path(id): Path<u32>,
) -> Response {
    into_api_response(
        mediator
            .send(GetOrder { id }, RequestContext::for_tenant(tenant))
            .await,
    )
}

fn router() -> Router {
    Router::new()
        .route("/orders/{id}", get(get_order))
        .layer(build_http_layers(&NetworkConfig::default()))
        .with_state(mediator())
}

async fn call(uri: &str, tenant: Option<&str>) -> (StatusCode, String, Value) {
    let mut builder = HttpRequest::get(uri);
    if let Some(tenant) = tenant {
        builder = builder.header("X-Tenant-Id", tenant);
    }
    let resp = router()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = resp.status();
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, content_type, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn missing_tenant_becomes_400_titled_with_fault_message() {
    let err = mediator()
        .send(GetOrder { id: 1 }, RequestContext::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineFault::TenantNotResolved { .. }));

    let problem = ProblemDetails::from_fault(&err);
    assert_eq!(problem.status, StatusCode::BAD_REQUEST);
    assert_eq!(problem.title, err.to_string());
}

#[tokio::test]
async fn not_found_outcome_becomes_404_problem() {
    let outcome = mediator()
        .send_for_tenant(GetOrder { id: 42 }, TenantContext::resolved("acme"))
        .await
        .unwrap();

    let problem = ProblemDetails::from_outcome(&outcome);
    assert_eq!(problem.status, StatusCode::NOT_FOUND);
    assert_eq!(problem.title, "Order.Missing");
    assert_eq!(problem.detail.as_deref(), Some("Order 42 not found"));
}

#[tokio::test]
async fn http_request_with_tenant_reaches_handler() {
    let (status, _, body) = call("/orders/1", Some("acme")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("acme/order-1".to_string()));
}

#[tokio::test]
async fn http_request_without_tenant_is_rejected() {
    let (status, content_type, body) = call("/orders/1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type, APPLICATION_PROBLEM_JSON);
    assert_eq!(body["status"], 400);
    assert!(body["title"]
        .as_str()
        .unwrap()
        .starts_with("Request 'GetOrder' requires a tenant context"));
}

#[tokio::test]
async fn http_request_with_blank_tenant_is_rejected() {
    let (status, _, _) = call("/orders/1", Some("  ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_not_found_renders_problem_document() {
    let (status, content_type, body) = call("/orders/42", Some("acme")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(content_type, APPLICATION_PROBLEM_JSON);
    assert_eq!(body["title"], "Order.Missing");
    assert_eq!(body["detail"], "Order 42 not found");
    assert_eq!(
        body["type"],
        "https://datatracker.ietf.org/doc/html/rfc7231#section-6.5.4"
    );
}

#[tokio::test]
async fn current_tenant_query_returns_resolved_tenant() {
    let outcome = mediator()
        .send_for_tenant(CurrentTenant, TenantContext::resolved("globex"))
        .await
        .unwrap();
    assert_eq!(outcome.value().tenant_id, "globex");
}

#[tokio::test]
async fn invalid_request_renders_validation_problem_with_field_errors() {
    // The lookup handler would answer 404 for id 0; a 400 means it never ran.
    let (status, content_type, body) = call("/orders/0", Some("acme")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type, APPLICATION_PROBLEM_JSON);
    assert_eq!(body["title"], "General.Validation");
    assert_eq!(body["errors"]["Id"][0], "Order id must be positive");
}

#[tokio::test]
async fn validation_runs_after_tenant_check() {
    let (status, _, body) = call("/orders/0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("errors").is_none());
}

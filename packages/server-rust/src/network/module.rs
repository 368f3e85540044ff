//! Network module with deferred startup lifecycle.
//!
//! `new()` creates resources, `start()` binds the TCP listener, and
//! `serve()` starts accepting connections until shutdown is signalled.

use std::future::Future;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use super::config::NetworkConfig;
use super::handlers::{current_tenant_handler, liveness_handler, AppState};
use super::middleware::build_http_layers;
use crate::pipeline::Mediator;

/// Manages the HTTP server lifecycle.
pub struct NetworkModule {
    config: NetworkConfig,
    mediator: Mediator,
    listener: Option<TcpListener>,
}

impl NetworkModule {
    /// Creates a new network module without binding any port.
    #[must_use]
    pub fn new(config: NetworkConfig, mediator: Mediator) -> Self {
        Self {
            config,
            mediator,
            listener: None,
        }
    }

    /// Assembles the axum router with all routes and middleware.
    ///
    /// Routes:
    /// - `GET /health/live` -- liveness probe
    /// - `GET /tenant` -- tenant resolved for the request, via the mediator
    pub fn build_router(&self) -> Router {
        let state = AppState {
            mediator: self.mediator.clone(),
        };

        Router::new()
            .route("/health/live", get(liveness_handler))
            .route("/tenant", get(current_tenant_handler))
            .layer(build_http_layers(&self.config))
            .with_state(state)
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the actual bound port, which may differ from the configured
    /// port when port 0 is used (OS-assigned ephemeral port).
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("TCP listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves connections until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called first or the server
    /// encounters a fatal I/O error.
    pub async fn serve(
        mut self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let router = self.build_router();
        let listener = self
            .listener
            .take()
            .ok_or_else(|| anyhow::anyhow!("start() must be called before serve()"))?;

        info!("Serving HTTP connections");
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::network::handlers::{CurrentTenant, CurrentTenantHandler};
    use crate::pipeline::PipelineFault;

    fn module() -> NetworkModule {
        let mediator = Mediator::builder()
            .register::<CurrentTenant, _>(CurrentTenantHandler)
            .build()
            .unwrap();
        NetworkModule::new(NetworkConfig::default(), mediator)
    }

    #[test]
    fn new_creates_module_without_binding() {
        assert!(module().listener.is_none());
    }

    #[tokio::test]
    async fn start_binds_to_os_assigned_port() {
        let mut module = module();
        let port = module.start().await.unwrap();
        assert!(port > 0, "OS-assigned port should be > 0");
        assert!(module.listener.is_some());
    }

    #[tokio::test]
    async fn serve_without_start_is_an_error() {
        let err = module().serve(std::future::pending::<()>()).await.unwrap_err();
        assert!(err.to_string().contains("start() must be called"));
    }

    #[tokio::test]
    async fn liveness_route_responds() {
        let resp = module()
            .build_router()
            .oneshot(Request::get("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));
    }

    async fn get_tenant(tenant: Option<&str>) -> (StatusCode, Option<String>, serde_json::Value) {
        let mut req = Request::get("/tenant");
        if let Some(tenant) = tenant {
            req = req.header("X-Tenant-Id", tenant);
        }
        let resp = module()
            .build_router()
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = resp.status();
        let content_type = resp
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, content_type, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn tenant_route_returns_resolved_tenant() {
        let (status, _, body) = get_tenant(Some("acme")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "tenant_id": "acme" }));
    }

    #[tokio::test]
    async fn tenant_route_without_header_is_a_problem() {
        let (status, content_type, body) = get_tenant(None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            content_type.as_deref(),
            Some(crate::problem::APPLICATION_PROBLEM_JSON)
        );
        assert_eq!(body["status"], 400);
        assert_eq!(
            body["title"],
            PipelineFault::tenant_not_resolved::<CurrentTenant>().to_string()
        );
    }
}

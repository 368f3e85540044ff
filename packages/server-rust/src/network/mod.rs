//! HTTP edge: configuration, tenant resolution, middleware, handlers, and server lifecycle.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod module;
pub mod tenant;

pub use config::NetworkConfig;
pub use handlers::AppState;
pub use module::NetworkModule;
pub use tenant::{resolve_tenant, tenant_context, Tenant, TenantResolutionLayer};

//! HTTP handler definitions for the API server.
//!
//! This module defines `AppState` (the shared state carried through axum
//! extractors) and re-exports all handler functions for convenient access
//! when building the router.

pub mod health;
pub mod tenant;

pub use health::liveness_handler;
pub use tenant::{current_tenant_handler, CurrentTenant, CurrentTenantHandler, TenantInfo};

use crate::pipeline::Mediator;

/// Shared application state passed to all axum handlers via `State` extraction.
#[derive(Clone)]
pub struct AppState {
    /// Dispatcher for every request reaching the pipeline.
    pub mediator: Mediator,
}

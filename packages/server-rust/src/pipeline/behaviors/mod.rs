//! Cross-cutting behaviors wrapped around every request handler.
//!
//! - [`tenant`]: rejects tenant-scoped requests without a resolved tenant
//! - [`logging`]: structured start/completion events tagged with the module name
//!
//! The stack is assembled from [`BEHAVIOR_ORDER`], outermost first: on the
//! way in behaviors run in declared order, on the way out in reverse.

pub mod logging;
pub mod tenant;

pub use logging::RequestLoggingLayer;
pub use tenant::TenantValidationLayer;

use recruitly_core::{Outcome, Request};
use tower::util::BoxService;
use tower::{Layer, Service};

use super::config::PipelineConfig;
use super::envelope::{Envelope, PipelineFault};

/// A behavior that can be placed in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    TenantValidation,
    RequestLogging,
}

/// System-wide behavior order, outermost to innermost.
///
/// Tenant validation runs before anything the handler could observe; logging
/// sits next to the handler so it records the handler's final outcome.
pub const BEHAVIOR_ORDER: [Behavior; 2] = [Behavior::TenantValidation, Behavior::RequestLogging];

/// Type-erased pipeline for one request type.
pub type RequestPipeline<R> =
    BoxService<Envelope<R>, Outcome<<R as Request>::Output>, PipelineFault>;

/// Wraps `handler` with every behavior in [`BEHAVIOR_ORDER`].
pub fn build_request_pipeline<R, S>(handler: S, config: &PipelineConfig) -> RequestPipeline<R>
where
    R: Request,
    S: Service<Envelope<R>, Response = Outcome<R::Output>, Error = PipelineFault> + Send + 'static,
    S::Future: Send + 'static,
{
    assemble(&BEHAVIOR_ORDER, BoxService::new(handler), config)
}

fn assemble<R: Request>(
    order: &[Behavior],
    handler: RequestPipeline<R>,
    config: &PipelineConfig,
) -> RequestPipeline<R> {
    order.iter().rev().fold(handler, |inner, behavior| match behavior {
        Behavior::TenantValidation => BoxService::new(TenantValidationLayer.layer(inner)),
        Behavior::RequestLogging => {
            BoxService::new(RequestLoggingLayer::new(config.module_segment).layer(inner))
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

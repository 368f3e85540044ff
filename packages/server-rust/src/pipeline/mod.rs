//! Request-processing pipeline.
//!
//! 1. **Envelope** (`envelope`): request + per-request context, and the faults that abort a pipeline
//! 2. **Handlers** (`handler`): the `RequestHandler` contract and the innermost tower stage
//! 3. **Behaviors** (`behaviors`): tower layers wrapped around every handler, in a fixed order
//! 4. **Validation** (`validation`): per-request-type input checks run just before the handler
//! 5. **Dispatch** (`mediator`): routes a request to its single handler by request type

pub mod behaviors;
pub mod config;
pub mod envelope;
pub mod handler;
pub mod identity;
pub mod mediator;
pub mod validation;

pub use behaviors::{build_request_pipeline, Behavior, BEHAVIOR_ORDER};
pub use config::PipelineConfig;
pub use envelope::{Envelope, PipelineFault, RequestContext};
pub use handler::{handler_fn, HandlerFn, HandlerService, RequestHandler};
pub use mediator::{Mediator, MediatorBuilder, RegistrationError};
pub use validation::{validator_fn, RequestValidationLayer, RequestValidator, ValidatorFn};

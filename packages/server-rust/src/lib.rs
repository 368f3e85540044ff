//! Recruitly Server: mediator pipeline with tenant validation and request
//! logging behaviors, problem-details error translation, and an axum edge.

pub mod config;
pub mod logging;
pub mod network;
pub mod pipeline;
pub mod problem;

pub use config::ServerConfig;
pub use pipeline::{Mediator, PipelineFault, RequestContext, RequestHandler, RequestValidator};
pub use problem::{ApiError, ProblemDetails};

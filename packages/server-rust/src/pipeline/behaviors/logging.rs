//! Request logging behavior.
//!
//! Tags every request with its module name in a `request` span and records
//! the final outcome of the inner stages. Observes only: the outcome or fault
//! returned by the inner service is passed on unchanged.

use std::task::{Context, Poll};

use recruitly_core::{Outcome, Request};
use tower::{Layer, Service};
use tracing::{error, info, info_span, Instrument};

use crate::pipeline::envelope::{Envelope, PipelineFault};
use crate::pipeline::handler::PipelineFuture;
use crate::pipeline::identity::{module_name, request_name, DEFAULT_MODULE_SEGMENT};

// ---------------------------------------------------------------------------
// RequestLoggingLayer
// ---------------------------------------------------------------------------

/// Tower layer that logs request start and completion.
#[derive(Debug, Clone, Copy)]
pub struct RequestLoggingLayer {
    module_segment: usize,
}

impl RequestLoggingLayer {
    /// `module_segment` selects which `::` segment of the request's type path
    /// is reported as its module.
    #[must_use]
    pub fn new(module_segment: usize) -> Self {
        Self { module_segment }
    }
}

impl Default for RequestLoggingLayer {
    fn default() -> Self {
        Self::new(DEFAULT_MODULE_SEGMENT)
    }
}

impl<S> Layer<S> for RequestLoggingLayer {
    type Service = RequestLoggingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLoggingService {
            inner,
            module_segment: self.module_segment,
        }
    }
}

// ---------------------------------------------------------------------------
// RequestLoggingService
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RequestLoggingService<S> {
    inner: S,
    module_segment: usize,
}

impl<R, S> Service<Envelope<R>> for RequestLoggingService<S>
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
        let request_name = request_name::<R>();
        let module = module_name::<R>(self.module_segment);

        let span = info_span!(
            "request",
            module = module,
            request = request_name,
            kind = R::KIND.as_str(),
        );

        let fut = span.in_scope(|| self.inner.call(envelope));

        Box::pin(
            async move {
                info!("Processing request {request_name}");
                let result = fut.await;

                match &result {
                    Ok(outcome) if outcome.is_success() => {
                        info!("Completed request {request_name}");
                    }
                    Ok(outcome) => {
                        let err = outcome.error();
                        error!(
                            error = %err,
                            error_code = err.code(),
                            error_kind = err.kind().as_str(),
                            "Completed request {request_name} with error"
                        );
                    }
                    Err(fault) => {
                        error!(fault = %fault, "Unhandled fault for {request_name}");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

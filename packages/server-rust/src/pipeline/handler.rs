//! Request handlers and the tower service that invokes them.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use recruitly_core::{Outcome, Request};
use tower::Service;

use super::envelope::{Envelope, PipelineFault, RequestContext};

/// Boxed future returned by every pipeline stage.
pub type PipelineFuture<T> =
    Pin<Box<dyn Future<Output = Result<Outcome<T>, PipelineFault>> + Send>>;

/// Handles one request type.
///
/// Expected failures are returned as `Outcome` failures. Business rule
/// violations and other faults are returned as `Err` and abort the pipeline.
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync + 'static {
    async fn handle(
        &self,
        request: R,
        ctx: &RequestContext,
    ) -> Result<Outcome<R::Output>, PipelineFault>;
}

// ---------------------------------------------------------------------------
// Closure handlers
// ---------------------------------------------------------------------------

/// Adapts an async closure into a [`RequestHandler`].
#[derive(Clone)]
pub struct HandlerFn<F>(F);

/// Wraps `f` so it can be registered as a handler.
pub fn handler_fn<F>(f: F) -> HandlerFn<F> {
    HandlerFn(f)
}

#[async_trait]
impl<R, F, Fut> RequestHandler<R> for HandlerFn<F>
where
    R: Request,
    F: Fn(R, RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Outcome<R::Output>, PipelineFault>> + Send,
{
    async fn handle(
        &self,
        request: R,
        ctx: &RequestContext,
    ) -> Result<Outcome<R::Output>, PipelineFault> {
        (self.0)(request, ctx.clone()).await
    }
}

// ---------------------------------------------------------------------------
// HandlerService
// ---------------------------------------------------------------------------

/// Innermost pipeline stage: calls the handler, racing it against the
/// request's cancellation token.
pub struct HandlerService<R: Request> {
    handler: Arc<dyn RequestHandler<R>>,
}

impl<R: Request> HandlerService<R> {
    #[must_use]
    pub fn new(handler: Arc<dyn RequestHandler<R>>) -> Self {
        Self { handler }
    }
}

impl<R: Request> Clone for HandlerService<R> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<R: Request> Service<Envelope<R>> for HandlerService<R> {
    type Response = Outcome<R::Output>;
    type Error = PipelineFault;
    type Future = PipelineFuture<R::Output>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, envelope: Envelope<R>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        Box::pin(async move {
            let Envelope { request, ctx } = envelope;
            let token = ctx.cancellation().clone();
            if token.is_cancelled() {
                return Err(PipelineFault::cancelled::<R>());
            }

            tokio::select! {
                biased;
                () = token.cancelled() => Err(PipelineFault::cancelled::<R>()),
                result = handler.handle(request, &ctx) => result,
            }
        })
    }
}

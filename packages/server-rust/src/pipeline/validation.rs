//! Per-request-type input validation.
//!
//! A validator registered for `R` runs immediately before `R`'s handler. A
//! non-empty error list short-circuits with a validation failure outcome;
//! the handler is not called. Request types without a validator pass through.

use std::sync::Arc;
use std::task::{Context, Poll};

use recruitly_core::{Error, Outcome, Request, ValidationError};
use tower::{Layer, Service};
use tracing::debug;

use super::envelope::{Envelope, PipelineFault};
use super::handler::PipelineFuture;
use super::identity::request_name;

/// Checks the shape of one request type.
///
/// Each returned error is reported under its code as a field, so validators
/// build them with [`Error::validation`]. An empty list means valid.
pub trait RequestValidator<R: Request>: Send + Sync + 'static {
    fn validate(&self, request: &R) -> Vec<Error>;
}

/// Adapts a closure into a [`RequestValidator`].
#[derive(Clone)]
pub struct ValidatorFn<F>(F);

/// Wraps `f` so it can be registered as a validator.
pub fn validator_fn<F>(f: F) -> ValidatorFn<F> {
    ValidatorFn(f)
}

impl<R, F> RequestValidator<R> for ValidatorFn<F>
where
    R: Request,
    F: Fn(&R) -> Vec<Error> + Send + Sync + 'static,
{
    fn validate(&self, request: &R) -> Vec<Error> {
        (self.0)(request)
    }
}

// ---------------------------------------------------------------------------
// RequestValidationLayer
// ---------------------------------------------------------------------------

/// Tower layer running the validator of `R`, if any, before the inner stage.
pub struct RequestValidationLayer<R: Request> {
    validator: Option<Arc<dyn RequestValidator<R>>>,
}

impl<R: Request> RequestValidationLayer<R> {
    #[must_use]
    pub fn new(validator: Option<Arc<dyn RequestValidator<R>>>) -> Self {
        Self { validator }
    }
}

impl<R: Request, S> Layer<S> for RequestValidationLayer<R> {
    type Service = RequestValidationService<R, S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestValidationService {
            validator: self.validator.clone(),
            inner,
        }
    }
}

// ---------------------------------------------------------------------------
// RequestValidationService
// ---------------------------------------------------------------------------

pub struct RequestValidationService<R: Request, S> {
    validator: Option<Arc<dyn RequestValidator<R>>>,
    inner: S,
}

impl<R: Request, S: Clone> Clone for RequestValidationService<R, S> {
    fn clone(&self) -> Self {
        Self {
            validator: self.validator.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<R, S> Service<Envelope<R>> for RequestValidationService<R, S>
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
        if let Some(validator) = &self.validator {
            let errors = validator.validate(&envelope.request);
            if !errors.is_empty() {
                debug!(
                    request = request_name::<R>(),
                    errors = errors.len(),
                    "request failed validation"
                );
                let outcome = Outcome::validation_failure(ValidationError::new(errors).into());
                return Box::pin(async move { Ok(outcome) });
            }
        }
        Box::pin(self.inner.call(envelope))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

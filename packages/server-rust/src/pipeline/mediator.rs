//! Request dispatch: routes a request to its single registered handler through
//! the behavior stack, with the request type's validator, if any, in front of
//! the handler.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use recruitly_core::{Outcome, Request, TenantContext};
use tower::{Layer, ServiceExt};
use tracing::debug;

use super::behaviors::build_request_pipeline;
use super::config::PipelineConfig;
use super::envelope::{Envelope, PipelineFault, RequestContext};
use super::handler::{HandlerService, RequestHandler};
use super::identity::request_name;
use super::validation::{RequestValidationLayer, RequestValidator};

/// Errors detected while wiring handlers, before any request is dispatched.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("more than one handler registered for request {request}")]
    DuplicateHandler { request: &'static str },
    #[error("no handler registered for required request {request}")]
    MissingHandler { request: &'static str },
    #[error("more than one validator registered for request {request}")]
    DuplicateValidator { request: &'static str },
}

/// A registered handler, type-erased so handlers for different request types
/// share one table. Holds an `Arc<dyn RequestHandler<R>>`.
struct Registration {
    handler: Arc<dyn Any + Send + Sync>,
}

/// Holds an `Arc<dyn RequestValidator<R>>`.
type ErasedValidator = Arc<dyn Any + Send + Sync>;

// ---------------------------------------------------------------------------
// MediatorBuilder
// ---------------------------------------------------------------------------

/// Collects handlers and validates the wiring.
#[derive(Default)]
pub struct MediatorBuilder {
    handlers: HashMap<TypeId, Registration>,
    validators: HashMap<TypeId, ErasedValidator>,
    required: Vec<(TypeId, &'static str)>,
    duplicates: Vec<&'static str>,
    duplicate_validators: Vec<&'static str>,
    config: PipelineConfig,
}

impl MediatorBuilder {
    #[must_use]
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers `handler` as the handler for `R`.
    #[must_use]
    pub fn register<R, H>(mut self, handler: H) -> Self
    where
        R: Request,
        H: RequestHandler<R>,
    {
        let handler: Arc<dyn RequestHandler<R>> = Arc::new(handler);
        let registration = Registration {
            handler: Arc::new(handler),
        };
        if self
            .handlers
            .insert(TypeId::of::<R>(), registration)
            .is_some()
        {
            self.duplicates.push(request_name::<R>());
        }
        self
    }

    /// Registers `validator` to run before the handler of `R`.
    #[must_use]
    pub fn validate_with<R, V>(mut self, validator: V) -> Self
    where
        R: Request,
        V: RequestValidator<R>,
    {
        let validator: Arc<dyn RequestValidator<R>> = Arc::new(validator);
        let erased: ErasedValidator = Arc::new(validator);
        if self.validators.insert(TypeId::of::<R>(), erased).is_some() {
            self.duplicate_validators.push(request_name::<R>());
        }
        self
    }

    /// Declares that `R` will be dispatched, so a missing handler is reported
    /// by [`build`](Self::build) instead of at dispatch time.
    #[must_use]
    pub fn require<R: Request>(mut self) -> Self {
        self.required.push((TypeId::of::<R>(), request_name::<R>()));
        self
    }

    /// # Errors
    ///
    /// Returns [`RegistrationError::DuplicateHandler`] or
    /// [`RegistrationError::DuplicateValidator`] if a request type got more
    /// than one of either, or [`RegistrationError::MissingHandler`] if a
    /// required request type got no handler.
    pub fn build(self) -> Result<Mediator, RegistrationError> {
        if let Some(request) = self.duplicates.first().copied() {
            return Err(RegistrationError::DuplicateHandler { request });
        }
        if let Some(request) = self.duplicate_validators.first().copied() {
            return Err(RegistrationError::DuplicateValidator { request });
        }
        if let Some(&(_, request)) = self
            .required
            .iter()
            .find(|(id, _)| !self.handlers.contains_key(id))
        {
            return Err(RegistrationError::MissingHandler { request });
        }

        debug!(
            handlers = self.handlers.len(),
            validators = self.validators.len(),
            "mediator built"
        );
        Ok(Mediator {
            handlers: Arc::new(self.handlers),
            validators: Arc::new(self.validators),
            config: self.config,
        })
    }
}

// ---------------------------------------------------------------------------
// Mediator
// ---------------------------------------------------------------------------

/// Dispatches requests to their handlers. Cheap to clone; the handler table is
/// shared and read-only after [`MediatorBuilder::build`].
#[derive(Clone)]
pub struct Mediator {
    handlers: Arc<HashMap<TypeId, Registration>>,
    validators: Arc<HashMap<TypeId, ErasedValidator>>,
    config: PipelineConfig,
}

impl Mediator {
    #[must_use]
    pub fn builder() -> MediatorBuilder {
        MediatorBuilder::default()
    }

    #[must_use]
    pub fn is_registered<R: Request>(&self) -> bool {
        self.handlers.contains_key(&TypeId::of::<R>())
    }

    fn handler<R: Request>(&self) -> Option<Arc<dyn RequestHandler<R>>> {
        self.handlers
            .get(&TypeId::of::<R>())
            .and_then(|entry| entry.handler.downcast_ref::<Arc<dyn RequestHandler<R>>>())
            .cloned()
    }

    fn validator<R: Request>(&self) -> Option<Arc<dyn RequestValidator<R>>> {
        self.validators
            .get(&TypeId::of::<R>())
            .and_then(|entry| entry.downcast_ref::<Arc<dyn RequestValidator<R>>>())
            .cloned()
    }

    /// Runs `request` through the behavior stack and its handler.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineFault`] when a behavior aborts the pipeline, the
    /// handler raises a fault, the request is cancelled, or no handler is
    /// registered for `R`.
    pub async fn send<R: Request>(
        &self,
        request: R,
        ctx: RequestContext,
    ) -> Result<Outcome<R::Output>, PipelineFault> {
        let handler = self
            .handler::<R>()
            .ok_or(PipelineFault::HandlerNotRegistered {
                request: request_name::<R>(),
            })?;

        let stage =
            RequestValidationLayer::new(self.validator::<R>()).layer(HandlerService::new(handler));
        let pipeline = build_request_pipeline(stage, &self.config);
        pipeline.oneshot(Envelope::new(request, ctx)).await
    }

    /// Shorthand for [`send`](Self::send) with a fresh cancellation token.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn send_for_tenant<R: Request>(
        &self,
        request: R,
        tenant: TenantContext,
    ) -> Result<Outcome<R::Output>, PipelineFault> {
        self.send(request, RequestContext::for_tenant(tenant)).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

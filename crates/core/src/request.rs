//! Request/handler abstraction and the validating pipeline.
//!
//! A use case is three pieces:
//!
//! ```text
//! Request (input fields) -> RequestValidator (pure rule check) -> RequestHandler (IO + mutation)
//! ```
//!
//! `Pipeline` composes the last two so that a request failing validation never
//! reaches its handler.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::RequestError;
use crate::validation::{DeriveValidator, RequestValidator};

/// Input of one use case, tied to the response it produces.
pub trait Request: Send + Sync + core::fmt::Debug + 'static {
    type Response: Send + 'static;
}

/// Orchestrates one use case.
///
/// Handlers receive their collaborators (repositories, buses) explicitly at
/// construction time. Requests are taken by value; dropping the returned
/// future cancels any in-flight repository IO.
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    async fn handle(&self, request: R) -> Result<R::Response, RequestError>;
}

#[async_trait]
impl<R, H> RequestHandler<R> for Arc<H>
where
    R: Request,
    H: RequestHandler<R> + ?Sized,
{
    async fn handle(&self, request: R) -> Result<R::Response, RequestError> {
        (**self).handle(request).await
    }
}

/// Validator + handler pair.
#[derive(Debug, Clone)]
pub struct Pipeline<V, H> {
    validator: V,
    handler: H,
}

impl<H> Pipeline<DeriveValidator, H> {
    /// Pipeline using the request's derived `validator::Validate` rules.
    pub fn validated(handler: H) -> Self {
        Self::new(DeriveValidator, handler)
    }
}

impl<V, H> Pipeline<V, H> {
    pub fn new(validator: V, handler: H) -> Self {
        Self { validator, handler }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Validate `request`, then hand it to the handler.
    pub async fn send<R>(&self, request: R) -> Result<R::Response, RequestError>
    where
        R: Request,
        V: RequestValidator<R>,
        H: RequestHandler<R>,
    {
        if let Err(errors) = self.validator.validate(&request) {
            tracing::debug!(?request, %errors, "request rejected by validator");
            return Err(RequestError::Validation(errors));
        }
        self.handler.handle(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::validation::ValidationErrors;

    #[derive(Debug)]
    struct Echo(String);

    impl Request for Echo {
        type Response = String;
    }

    struct NonEmpty;

    impl RequestValidator<Echo> for NonEmpty {
        fn validate(&self, request: &Echo) -> Result<(), ValidationErrors> {
            let mut errors = ValidationErrors::new();
            if request.0.is_empty() {
                errors.push("value", "must not be empty");
            }
            errors.into_result()
        }
    }

    #[derive(Default)]
    struct CountingHandler {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RequestHandler<Echo> for CountingHandler {
        async fn handle(&self, request: Echo) -> Result<String, RequestError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(request.0)
        }
    }

    #[tokio::test]
    async fn valid_request_reaches_handler() {
        let pipeline = Pipeline::new(NonEmpty, CountingHandler::default());
        let out = pipeline.send(Echo("hi".into())).await.unwrap();
        assert_eq!(out, "hi");
        assert_eq!(pipeline.handler().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_request_never_reaches_handler() {
        let pipeline = Pipeline::new(NonEmpty, CountingHandler::default());
        let err = pipeline.send(Echo(String::new())).await.unwrap_err();
        match err {
            RequestError::Validation(e) => assert!(e.has_field("value")),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(pipeline.handler().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn arc_handlers_delegate() {
        let handler = Arc::new(CountingHandler::default());
        let pipeline = Pipeline::new(NonEmpty, handler.clone());
        pipeline.send(Echo("a".into())).await.unwrap();
        assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
    }
}

//! Error handling middleware
//!
//! Catches errors from the downstream handler and converts them into HTTP
//! responses via the ordered classifier. Errors the instance is not scoped
//! to (content-type gate) propagate unchanged so an outer instance can take
//! them.

use std::fmt;
use std::sync::Arc;

use crate::errors::resolution::{resolve, DEFAULT_STATUS};
use crate::logging::{ErrorLog, TracingErrorLog};
use crate::middleware::pipeline::{Middleware, Next, NextFuture};
use crate::negotiation;
use crate::request::Request;
use crate::response::ResponseFactory;

/// Classifier-path error middleware
///
/// On a downstream error: gate on the request's Accept header, hand the
/// error to the factory's sink if it has one, resolve the error's wire form
/// onto a fresh factory response, and log through the configured sink when
/// the final status is still the 500 default.
pub struct ErrorHandlerMiddleware {
    factory: Arc<dyn ResponseFactory>,
    content_types: Option<Vec<String>>,
    logger: Arc<dyn ErrorLog>,
}

impl fmt::Debug for ErrorHandlerMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorHandlerMiddleware")
            .field("content_types", &self.content_types)
            .finish_non_exhaustive()
    }
}

impl ErrorHandlerMiddleware {
    pub fn new(factory: Arc<dyn ResponseFactory>) -> Self {
        Self {
            factory,
            content_types: None,
            logger: Arc::new(TracingErrorLog),
        }
    }

    /// Restrict this instance to requests accepting one of the given media
    /// types; others propagate their errors to an outer layer
    pub fn with_content_types<I, T>(mut self, content_types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.content_types = Some(content_types.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the default tracing sink
    pub fn with_logger(mut self, logger: Arc<dyn ErrorLog>) -> Self {
        self.logger = logger;
        self
    }
}

impl Middleware for ErrorHandlerMiddleware {
    fn handle(&self, request: Request, next: Next) -> NextFuture<'static> {
        let factory = Arc::clone(&self.factory);
        let content_types = self.content_types.clone();
        let logger = Arc::clone(&self.logger);

        Box::pin(async move {
            let accept = request.accept().map(str::to_owned);

            let error = match next.run(request).await {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            // Response type is not acceptable by the requester - propagate
            // to the outer handler
            if let Some(types) = &content_types {
                if !negotiation::is_accepted(accept.as_deref(), types) {
                    return Err(error);
                }
            }

            // Provide the caught error
            if let Some(sink) = factory.error_sink() {
                sink.set_error(&error);
            }

            let parts = resolve(&error);
            let mut response = factory.create_response(parts.status, &parts.reason);
            for (name, value) in parts.headers {
                response.insert_header(name, value);
            }

            // Status is still the default one - log
            if response.status_code() == DEFAULT_STATUS {
                logger.error(&error.to_string());
            }

            Ok(response)
        })
    }

    fn name(&self) -> &'static str {
        "ErrorHandlerMiddleware"
    }
}

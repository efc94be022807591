//! Last-resort error middleware
//!
//! Delegates error-to-response conversion to a registered chain of handlers.
//! Unlike a first-match dispatcher, every handler that claims the error
//! fires, each mutating the response the previous one produced; an error no
//! handler claims propagates untouched.

pub mod handler;

pub use handler::{ErrorHandler, HttpErrorHandler};

use std::fmt;
use std::sync::Arc;

use axum::http::StatusCode;

use crate::logging::{ErrorLog, TracingErrorLog};
use crate::middleware::pipeline::{Middleware, Next, NextFuture};
use crate::negotiation;
use crate::request::Request;
use crate::response::ResponseFactory;

/// Chain-path error middleware
///
/// Handler registration order is application order. Registration completes
/// before traffic is served; the chain is read-only while handling requests.
pub struct LastResortMiddleware {
    factory: Arc<dyn ResponseFactory>,
    content_types: Option<Vec<String>>,
    handlers: Vec<Arc<dyn ErrorHandler>>,
    logger: Arc<dyn ErrorLog>,
}

impl fmt::Debug for LastResortMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LastResortMiddleware")
            .field("content_types", &self.content_types)
            .field("handlers", &format!("<{} handlers>", self.handlers.len()))
            .finish_non_exhaustive()
    }
}

impl LastResortMiddleware {
    pub fn new(factory: Arc<dyn ResponseFactory>) -> Self {
        Self {
            factory,
            content_types: None,
            handlers: Vec::new(),
            logger: Arc::new(TracingErrorLog),
        }
    }

    /// Restrict this instance to requests accepting one of the given media
    /// types
    pub fn with_content_types<I, T>(mut self, content_types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.content_types = Some(content_types.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the response factory
    pub fn set_response_factory(&mut self, factory: Arc<dyn ResponseFactory>) -> &mut Self {
        self.factory = factory;
        self
    }

    /// Replace the content-type restriction
    pub fn set_content_types(&mut self, content_types: Option<Vec<String>>) -> &mut Self {
        self.content_types = content_types;
        self
    }

    /// Replace the default tracing sink
    pub fn with_logger(mut self, logger: Arc<dyn ErrorLog>) -> Self {
        self.logger = logger;
        self
    }

    /// Append a handler to the chain
    pub fn add_handler<H: ErrorHandler + 'static>(mut self, handler: H) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Append several handlers, preserving order
    pub fn add_handlers<I>(mut self, handlers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn ErrorHandler>>,
    {
        self.handlers.extend(handlers);
        self
    }
}

impl Middleware for LastResortMiddleware {
    fn handle(&self, request: Request, next: Next) -> NextFuture<'static> {
        let factory = Arc::clone(&self.factory);
        let content_types = self.content_types.clone();
        let handlers = self.handlers.clone();
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

            let mut handled = false;
            let mut response = factory.create_response(StatusCode::OK, "");
            for handler in &handlers {
                if !handler.can_handle(&error) {
                    continue;
                }

                response = handler.handle(&error, response);
                if handler.should_log(&error) {
                    logger.error(&error.to_string());
                }
                handled = true;
            }

            // No handler was able to handle
            if !handled {
                return Err(error);
            }

            Ok(response)
        })
    }

    fn name(&self) -> &'static str {
        "LastResortMiddleware"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HttpError;
    use crate::response::{JsonResponseFactory, Response};
    use axum::http::{header, HeaderMap, HeaderValue, Method};
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct RecordingLog {
        messages: Mutex<Vec<String>>,
    }

    impl ErrorLog for RecordingLog {
        fn error(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    /// Claims everything; sets a status and marks itself in a header
    struct StatusHandler {
        status: StatusCode,
        log: bool,
    }

    impl ErrorHandler for StatusHandler {
        fn can_handle(&self, _error: &HttpError) -> bool {
            true
        }

        fn should_log(&self, _error: &HttpError) -> bool {
            self.log
        }

        fn handle(&self, _error: &HttpError, mut response: Response) -> Response {
            response.set_status(self.status);
            response
        }
    }

    /// Claims everything; only adds a header
    struct HeaderHandler;

    impl ErrorHandler for HeaderHandler {
        fn can_handle(&self, _error: &HttpError) -> bool {
            true
        }

        fn should_log(&self, _error: &HttpError) -> bool {
            false
        }

        fn handle(&self, _error: &HttpError, mut response: Response) -> Response {
            response.insert_header(
                axum::http::HeaderName::from_static("x-extra"),
                HeaderValue::from_static("1"),
            );
            response
        }
    }

    fn request(accept: Option<&str>) -> Request {
        let mut headers = HeaderMap::new();
        if let Some(accept) = accept {
            headers.insert(header::ACCEPT, HeaderValue::from_str(accept).unwrap());
        }
        Request::new(Method::GET, "/".parse().unwrap(), headers)
    }

    fn failing_next(error: HttpError) -> Next {
        Next::new(move |_req| Box::pin(async move { Err(error) }))
    }

    #[tokio::test]
    async fn test_all_matching_handlers_fire() {
        let middleware = LastResortMiddleware::new(Arc::new(JsonResponseFactory::new()))
            .add_handler(StatusHandler {
                status: StatusCode::BAD_REQUEST,
                log: false,
            })
            .add_handler(HeaderHandler);

        let response = middleware
            .handle(request(None), failing_next(HttpError::internal("boom")))
            .await
            .unwrap();

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(response.get_header("x-extra").unwrap(), "1");
    }

    #[tokio::test]
    async fn test_later_handlers_win_on_conflict() {
        let middleware = LastResortMiddleware::new(Arc::new(JsonResponseFactory::new()))
            .add_handler(StatusHandler {
                status: StatusCode::BAD_REQUEST,
                log: false,
            })
            .add_handler(StatusHandler {
                status: StatusCode::IM_A_TEAPOT,
                log: false,
            });

        let response = middleware
            .handle(request(None), failing_next(HttpError::internal("boom")))
            .await
            .unwrap();

        assert_eq!(response.status_code(), StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn test_unclaimed_error_is_reraised() {
        let middleware = LastResortMiddleware::new(Arc::new(JsonResponseFactory::new()))
            .add_handler(HttpErrorHandler);

        let result = middleware
            .handle(request(None), failing_next(HttpError::not_found()))
            .await;

        assert!(matches!(result, Err(HttpError::NotFound)));
    }

    #[tokio::test]
    async fn test_empty_chain_reraises() {
        let middleware = LastResortMiddleware::new(Arc::new(JsonResponseFactory::new()));

        let result = middleware
            .handle(
                request(None),
                failing_next(HttpError::internal("nobody home")),
            )
            .await;

        assert!(matches!(result, Err(HttpError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_should_log_fires_immediately_per_handler() {
        let log = Arc::new(RecordingLog::default());
        let middleware = LastResortMiddleware::new(Arc::new(JsonResponseFactory::new()))
            .with_logger(log.clone())
            .add_handler(StatusHandler {
                status: StatusCode::BAD_GATEWAY,
                log: true,
            })
            .add_handler(StatusHandler {
                status: StatusCode::BAD_GATEWAY,
                log: true,
            });

        middleware
            .handle(request(None), failing_next(HttpError::internal("twice")))
            .await
            .unwrap();

        // One entry per matching handler that requested logging
        assert_eq!(log.messages.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_gate_defers_to_outer_instance() {
        let middleware = LastResortMiddleware::new(Arc::new(JsonResponseFactory::new()))
            .with_content_types(["application/json"])
            .add_handler(StatusHandler {
                status: StatusCode::BAD_REQUEST,
                log: false,
            });

        let result = middleware
            .handle(
                request(Some("text/html")),
                failing_next(HttpError::internal("elsewhere")),
            )
            .await;

        assert!(matches!(result, Err(HttpError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_stock_http_error_handler_applies_wire_form() {
        let middleware = LastResortMiddleware::new(Arc::new(JsonResponseFactory::new()))
            .add_handler(HttpErrorHandler);

        let response = middleware
            .handle(
                request(None),
                failing_next(HttpError::http(StatusCode::PAYMENT_REQUIRED, "pay up")),
            )
            .await
            .unwrap();

        assert_eq!(response.status_code(), StatusCode::PAYMENT_REQUIRED);
        assert_eq!(response.reason_phrase(), "pay up");
    }

    #[test]
    fn test_setters_reconfigure() {
        let mut middleware = LastResortMiddleware::new(Arc::new(JsonResponseFactory::new()));
        middleware
            .set_content_types(Some(vec!["text/html".to_string()]))
            .set_response_factory(Arc::new(JsonResponseFactory::new()));
        assert_eq!(
            middleware.content_types,
            Some(vec!["text/html".to_string()])
        );
    }
}

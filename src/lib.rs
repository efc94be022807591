//! # backstop-http
//!
//! Error-handling middleware and response factories for axum-based request
//! pipelines:
//! - An error-handling middleware that converts downstream errors into HTTP
//!   responses via an ordered, type-based classifier
//! - A last-resort middleware that delegates conversion to a registered
//!   chain of pluggable handlers, every matching link firing in order
//! - JSON and file/stream response factories
//!
//! Several error-middleware instances can coexist, each scoped to one
//! content family via an Accept-header gate; errors an instance cannot
//! classify propagate to the outer layer rather than being swallowed.

pub mod errors;
pub mod logging;
pub mod middleware;
pub mod negotiation;
pub mod request;
pub mod response;

pub use errors::{resolve, ErrorParts, HttpError, HttpResult, DEFAULT_STATUS};
pub use logging::{ErrorLog, TracingErrorLog};
pub use middleware::{
    ErrorHandler, ErrorHandlerMiddleware, HttpErrorHandler, LastResortMiddleware, Middleware,
    MiddlewarePipeline, Next, NextFuture,
};
pub use request::Request;
pub use response::{
    ErrorSink, FileFactoryOptions, FileResponseFactory, JsonFactoryOptions, JsonResponseFactory,
    Response, ResponseBody, ResponseFactory,
};

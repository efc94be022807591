//! Response factory contract
//!
//! Middlewares obtain fresh responses through [`ResponseFactory`]. A factory
//! that wants the caught error for diagnostic enrichment (e.g. a development
//! build embedding the failure in the body) exposes an [`ErrorSink`] through
//! `error_sink()`; the middleware hands the error over before building the
//! response.

use axum::http::StatusCode;

use crate::errors::HttpError;
use crate::response::Response;

/// Receives the caught error before the response is built
pub trait ErrorSink: Send + Sync {
    fn set_error(&self, error: &HttpError);
}

/// Builds outgoing responses for the middlewares
pub trait ResponseFactory: Send + Sync {
    /// Build a fresh response with the given status and reason phrase
    fn create_response(&self, status: StatusCode, reason: &str) -> Response;

    /// Optional capability: a sink for the caught error
    fn error_sink(&self) -> Option<&dyn ErrorSink> {
        None
    }
}

//! HTTP error types
//!
//! The error taxonomy consumed by the error-handling middlewares. Every
//! downstream failure surfaces as one of these variants; the middleware
//! resolves classified variants locally and logs the rest.

use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use thiserror::Error;

/// Result type for request handling and response construction
pub type HttpResult<T> = Result<T, HttpError>;

/// Errors raised by downstream handlers and caught by the middlewares
#[derive(Error, Debug)]
pub enum HttpError {
    /// An error that already carries its own wire form
    #[error("{message}")]
    Http {
        status: StatusCode,
        message: String,
        headers: HeaderMap,
    },

    #[error("route not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed { allowed: Vec<String> },

    #[error("requested representation is not available")]
    NotAcceptable,

    /// Unclassified failure; resolves to 500 and is always logged
    #[error("{message}")]
    Internal { message: String },
}

impl HttpError {
    /// Create an HTTP-classified error with no extra headers
    pub fn http<T: Into<String>>(status: StatusCode, message: T) -> Self {
        HttpError::Http {
            status,
            message: message.into(),
            headers: HeaderMap::new(),
        }
    }

    /// Create an HTTP-classified error carrying response headers
    pub fn http_with_headers<T: Into<String>>(
        status: StatusCode,
        message: T,
        headers: HeaderMap,
    ) -> Self {
        HttpError::Http {
            status,
            message: message.into(),
            headers,
        }
    }

    /// Create a routing not-found error
    pub fn not_found() -> Self {
        HttpError::NotFound
    }

    /// Create a method-not-allowed error carrying the allowed methods
    pub fn method_not_allowed<I, T>(allowed: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        HttpError::MethodNotAllowed {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a not-acceptable error
    pub fn not_acceptable() -> Self {
        HttpError::NotAcceptable
    }

    /// Create an unclassified internal error
    pub fn internal<T: Into<String>>(message: T) -> Self {
        HttpError::Internal {
            message: message.into(),
        }
    }

    /// Attach a header to an HTTP-classified error; other variants are
    /// returned unchanged
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        if let HttpError::Http { headers, .. } = &mut self {
            headers.insert(name, value);
        }
        self
    }
}

impl From<std::io::Error> for HttpError {
    fn from(err: std::io::Error) -> Self {
        HttpError::Internal {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<serde_json::Error> for HttpError {
    fn from(err: serde_json::Error) -> Self {
        HttpError::Internal {
            message: format!("JSON serialization error: {}", err),
        }
    }
}

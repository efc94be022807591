//! JSON response factory

use axum::http::{header, StatusCode};
use serde::Serialize;

use crate::errors::HttpResult;
use crate::response::{Response, ResponseFactory};

/// Construction-time options for [`JsonResponseFactory`]
#[derive(Debug, Clone)]
pub struct JsonFactoryOptions {
    /// Media type declared on every response this factory builds
    pub content_type: String,
    /// Pretty-print serialized payloads
    pub pretty: bool,
}

impl Default for JsonFactoryOptions {
    fn default() -> Self {
        Self {
            content_type: "application/json".to_string(),
            pretty: false,
        }
    }
}

/// Builds JSON responses
///
/// `success` serializes a payload into the body; serialization failures
/// propagate as errors rather than producing a half-written response.
#[derive(Debug, Default)]
pub struct JsonResponseFactory {
    options: JsonFactoryOptions,
}

impl JsonResponseFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: JsonFactoryOptions) -> Self {
        Self { options }
    }

    /// Build a 200 response with the serialized payload as body
    pub fn success<T: Serialize>(&self, payload: &T) -> HttpResult<Response> {
        self.success_with(payload, self.options.pretty)
    }

    /// Build a 200 response, overriding the configured pretty flag
    pub fn success_with<T: Serialize>(&self, payload: &T, pretty: bool) -> HttpResult<Response> {
        let body = if pretty {
            serde_json::to_string_pretty(payload)?
        } else {
            serde_json::to_string(payload)?
        };
        Ok(self.make_response(StatusCode::OK, "").text(body))
    }

    /// Build a bare response carrying only a status and the declared media type
    pub fn error(&self, status: StatusCode) -> Response {
        self.make_response(status, "")
    }

    fn make_response(&self, status: StatusCode, reason: &str) -> Response {
        let mut response = Response::with_status(status).reason(reason);
        match axum::http::HeaderValue::from_str(&self.options.content_type) {
            Ok(value) => response.insert_header(header::CONTENT_TYPE, value),
            Err(e) => tracing::error!("Configured content type is not a valid header value: {}", e),
        }
        response
    }
}

impl ResponseFactory for JsonResponseFactory {
    fn create_response(&self, status: StatusCode, reason: &str) -> Response {
        self.make_response(status, reason)
    }
}

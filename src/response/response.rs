//! Response abstraction for building HTTP responses
//!
//! Fluent builder over status, reason phrase, headers, and body. Error
//! handlers mutate a `Response` incrementally; `build()` lowers it to an
//! `axum::response::Response` at the pipeline boundary.

use std::fmt;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
};
use futures_util::stream::{BoxStream, Stream, StreamExt};
use serde::Serialize;

use crate::errors::{HttpError, HttpResult};

/// Response builder with status, reason phrase, headers, and body
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    reason: Option<String>,
    headers: HeaderMap,
    body: ResponseBody,
}

/// Response body variants
pub enum ResponseBody {
    Empty,
    Text(String),
    Bytes(Bytes),
    Json(serde_json::Value),
    Stream(BoxStream<'static, std::io::Result<Bytes>>),
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl Response {
    /// Create new response with OK status
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            reason: None,
            headers: HeaderMap::new(),
            body: ResponseBody::Empty,
        }
    }

    /// Create response with specific status code
    pub fn with_status(status: StatusCode) -> Self {
        Self {
            status,
            ..Self::new()
        }
    }

    /// Create response with OK status
    pub fn ok() -> Self {
        Self::new()
    }

    /// Set response status code (consuming)
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Set response status code (borrowing - for handler use)
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Get response status code
    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    /// Set reason phrase (consuming); an empty phrase clears it
    pub fn reason<S: Into<String>>(mut self, reason: S) -> Self {
        self.set_reason(reason);
        self
    }

    /// Set reason phrase (borrowing - for handler use)
    pub fn set_reason<S: Into<String>>(&mut self, reason: S) {
        let reason = reason.into();
        self.reason = if reason.is_empty() { None } else { Some(reason) };
    }

    /// Reason phrase resolved for this response, empty if none was set
    ///
    /// Contract data for callers and tests; axum does not write custom
    /// reason phrases to the HTTP/1 status line.
    pub fn reason_phrase(&self) -> &str {
        self.reason.as_deref().unwrap_or("")
    }

    /// Get response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Check if response has a specific header
    pub fn has_header<K: AsRef<str>>(&self, key: K) -> bool {
        self.headers.contains_key(key.as_ref())
    }

    /// Get header value by name
    pub fn get_header<K: AsRef<str>>(&self, key: K) -> Option<&HeaderValue> {
        self.headers.get(key.as_ref())
    }

    /// Add header to response (consuming)
    pub fn header<K, V>(mut self, key: K, value: V) -> HttpResult<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.add_header(key, value)?;
        Ok(self)
    }

    /// Add header to response (borrowing - for handler use)
    pub fn add_header<K, V>(&mut self, key: K, value: V) -> HttpResult<()>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let name = key
            .as_ref()
            .parse::<HeaderName>()
            .map_err(|e| HttpError::internal(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::from_str(value.as_ref())
            .map_err(|e| HttpError::internal(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Insert an already-typed header pair (borrowing - for handler use)
    pub fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    /// Set Content-Type header (consuming)
    pub fn content_type(self, content_type: &str) -> HttpResult<Self> {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Set response body as text (consuming)
    pub fn text<S: Into<String>>(mut self, text: S) -> Self {
        self.body = ResponseBody::Text(text.into());
        self
    }

    /// Set response body as bytes (consuming)
    pub fn bytes(mut self, bytes: Bytes) -> Self {
        self.body = ResponseBody::Bytes(bytes);
        self
    }

    /// Set response body as JSON (consuming)
    pub fn json<T: Serialize>(mut self, data: &T) -> HttpResult<Self> {
        let value = serde_json::to_value(data)?;
        self.body = ResponseBody::Json(value);
        Ok(self)
    }

    /// Set response body as raw JSON value (consuming)
    pub fn json_value(mut self, value: serde_json::Value) -> Self {
        self.body = ResponseBody::Json(value);
        self
    }

    /// Set response body as a byte stream (consuming)
    pub fn stream<S>(mut self, stream: S) -> Self
    where
        S: Stream<Item = std::io::Result<Bytes>> + Send + 'static,
    {
        self.body = ResponseBody::Stream(stream.boxed());
        self
    }

    /// Inspect the body variant
    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// Build the axum response
    pub fn build(mut self) -> HttpResult<axum::response::Response> {
        // Default content type follows the body variant unless already set
        if !self.headers.contains_key(header::CONTENT_TYPE) {
            match &self.body {
                ResponseBody::Json(_) => {
                    self.headers.insert(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("application/json"),
                    );
                }
                ResponseBody::Text(_) => {
                    self.headers.insert(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("text/plain; charset=utf-8"),
                    );
                }
                _ => {}
            }
        }

        let body = match self.body {
            ResponseBody::Empty => Body::empty(),
            ResponseBody::Text(text) => Body::from(text),
            ResponseBody::Bytes(bytes) => Body::from(bytes),
            ResponseBody::Json(value) => Body::from(serde_json::to_string(&value)?),
            ResponseBody::Stream(stream) => Body::from_stream(stream),
        };

        let mut response = axum::response::Response::builder()
            .status(self.status)
            .body(body)
            .map_err(|e| HttpError::internal(format!("Failed to build response: {}", e)))?;
        *response.headers_mut() = self.headers;

        Ok(response)
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

//! Request abstraction
//!
//! The slice of an HTTP request the error middlewares read: method, URI, and
//! headers, with an accessor for the `Accept` header used by the negotiation
//! gate.

use axum::{
    body::Bytes,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
};

use crate::errors::{HttpError, HttpResult};

/// Incoming request handed through the middleware pipeline
#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    body: Option<Bytes>,
}

impl Request {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        Self {
            method,
            uri,
            headers,
            body: None,
        }
    }

    /// Request path portion of the URI
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Get a header value by name
    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    /// Raw `Accept` header value, if present and valid UTF-8
    pub fn accept(&self) -> Option<&str> {
        self.headers
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok())
    }

    /// Set request body bytes (consuming)
    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    /// Add header to request (consuming)
    pub fn with_header<K, V>(mut self, key: K, value: V) -> HttpResult<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let name = key
            .as_ref()
            .parse::<axum::http::HeaderName>()
            .map_err(|e| HttpError::http(StatusCode::BAD_REQUEST, format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::from_str(value.as_ref())
            .map_err(|e| HttpError::http(StatusCode::BAD_REQUEST, format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Request body bytes, if buffered
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }
}

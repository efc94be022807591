//! Error-to-wire-form resolution
//!
//! Maps a caught [`HttpError`] to the status code, reason phrase, and header
//! set its response should carry. The mapping is one exhaustive match so the
//! priority order stays auditable in a single place.

use axum::http::{header, HeaderName, HeaderValue, StatusCode};

use super::HttpError;

/// Status used when no rule classifies the error; a response still at this
/// status after resolution is logged
pub const DEFAULT_STATUS: StatusCode = StatusCode::INTERNAL_SERVER_ERROR;

/// Resolved wire form of an error
#[derive(Debug, Clone)]
pub struct ErrorParts {
    pub status: StatusCode,
    pub reason: String,
    pub headers: Vec<(HeaderName, HeaderValue)>,
}

impl ErrorParts {
    fn bare(status: StatusCode) -> Self {
        Self {
            status,
            reason: String::new(),
            headers: Vec::new(),
        }
    }
}

/// Classify an error into its wire form
///
/// Pure mapping, first match wins:
/// HTTP-classified errors keep their embedded status, message, and headers;
/// routing errors map to 404/405/406 (405 gains an `Allow` header); anything
/// else falls back to [`DEFAULT_STATUS`].
pub fn resolve(error: &HttpError) -> ErrorParts {
    match error {
        HttpError::Http {
            status,
            message,
            headers,
        } => ErrorParts {
            status: *status,
            reason: message.clone(),
            headers: headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        },
        HttpError::NotFound => ErrorParts::bare(StatusCode::NOT_FOUND),
        HttpError::MethodNotAllowed { allowed } => {
            let mut parts = ErrorParts::bare(StatusCode::METHOD_NOT_ALLOWED);
            match HeaderValue::from_str(&allowed.join(", ")) {
                Ok(value) => parts.headers.push((header::ALLOW, value)),
                Err(_) => {
                    tracing::warn!("allowed-methods list is not a valid header value; Allow header dropped");
                }
            }
            parts
        }
        HttpError::NotAcceptable => ErrorParts::bare(StatusCode::NOT_ACCEPTABLE),
        HttpError::Internal { .. } => ErrorParts::bare(DEFAULT_STATUS),
    }
}

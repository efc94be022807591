//! Pluggable error handlers for the last-resort middleware

use crate::errors::HttpError;
use crate::response::Response;

/// One link in the error-handler chain
///
/// Every registered handler whose `can_handle` returns true gets to mutate
/// the response; later links apply on top of earlier ones.
pub trait ErrorHandler: Send + Sync {
    /// Whether this handler claims the error
    fn can_handle(&self, error: &HttpError) -> bool;

    /// Whether the error should be logged when this handler fires
    fn should_log(&self, error: &HttpError) -> bool;

    /// Apply this handler's response mutations
    fn handle(&self, error: &HttpError, response: Response) -> Response;
}

/// Stock handler for errors that carry their own wire form
///
/// Applies the embedded status, reason, and headers; never requests logging.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpErrorHandler;

impl ErrorHandler for HttpErrorHandler {
    fn can_handle(&self, error: &HttpError) -> bool {
        matches!(error, HttpError::Http { .. })
    }

    fn should_log(&self, _error: &HttpError) -> bool {
        false
    }

    fn handle(&self, error: &HttpError, mut response: Response) -> Response {
        if let HttpError::Http {
            status,
            message,
            headers,
        } = error
        {
            response.set_status(*status);
            response.set_reason(message.clone());
            for (name, value) in headers {
                response.insert_header(name.clone(), value.clone());
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, StatusCode};

    #[test]
    fn test_claims_only_classified_errors() {
        let handler = HttpErrorHandler;
        assert!(handler.can_handle(&HttpError::http(StatusCode::GONE, "gone")));
        assert!(!handler.can_handle(&HttpError::not_found()));
        assert!(!handler.can_handle(&HttpError::internal("boom")));
    }

    #[test]
    fn test_applies_embedded_wire_form() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("10"));
        let error =
            HttpError::http_with_headers(StatusCode::SERVICE_UNAVAILABLE, "warming up", headers);

        let handler = HttpErrorHandler;
        let response = handler.handle(&error, Response::ok());

        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.reason_phrase(), "warming up");
        assert_eq!(response.get_header("retry-after").unwrap(), "10");
        assert!(!handler.should_log(&error));
    }
}

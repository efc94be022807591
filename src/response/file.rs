//! File response factory
//!
//! Wraps an async byte source as a streaming response body. Download mode
//! adds the cache-control, accept-ranges, and content-disposition headers,
//! with the filename passed through a whitelist sanitizer.

use std::path::Path;

use axum::http::StatusCode;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

use crate::errors::{HttpError, HttpResult};
use crate::response::{Response, ResponseFactory};

/// Default whitelist: letters (Latin and Cyrillic), digits, dot, underscore,
/// hyphen. Everything else collapses to a dash.
pub const DEFAULT_SAFE_CHARACTERS: &str = r"\p{Cyrillic}\p{Latin}\p{N}._\-";

static DEFAULT_UNSAFE_RUNS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("[^{}]+", DEFAULT_SAFE_CHARACTERS))
        .expect("default safe-characters pattern compiles")
});

/// Filename used when a download has no usable name
const FALLBACK_FILENAME: &str = "download";

/// Construction-time options for [`FileResponseFactory`]
#[derive(Debug, Clone)]
pub struct FileFactoryOptions {
    /// Regex character-class fragment of filename-safe characters
    pub safe_characters: String,
}

impl Default for FileFactoryOptions {
    fn default() -> Self {
        Self {
            safe_characters: DEFAULT_SAFE_CHARACTERS.to_string(),
        }
    }
}

/// Builds streaming file responses
#[derive(Debug, Clone)]
pub struct FileResponseFactory {
    unsafe_runs: Regex,
}

impl FileResponseFactory {
    pub fn new() -> Self {
        Self {
            unsafe_runs: DEFAULT_UNSAFE_RUNS.clone(),
        }
    }

    /// Create with custom options; fails if the safe-characters fragment is
    /// not a valid character class
    pub fn with_options(options: FileFactoryOptions) -> HttpResult<Self> {
        let unsafe_runs = Regex::new(&format!("[^{}]+", options.safe_characters))
            .map_err(|e| HttpError::internal(format!("Invalid safe-characters pattern: {}", e)))?;
        Ok(Self { unsafe_runs })
    }

    /// Stream a file from disk; the download filename derives from the path's
    /// basename
    pub async fn stream_path<P: AsRef<Path>>(
        &self,
        path: P,
        download: bool,
    ) -> HttpResult<Response> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path).await?;
        let filename = path.file_name().and_then(|name| name.to_str());
        self.stream_from(file, download, filename)
    }

    /// Stream any async byte source as the response body
    pub fn stream_from<R>(
        &self,
        reader: R,
        download: bool,
        filename: Option<&str>,
    ) -> HttpResult<Response>
    where
        R: AsyncRead + Send + 'static,
    {
        let mut response = Response::ok().stream(ReaderStream::new(reader));

        if download {
            let filename = self.sanitize_filename(filename.unwrap_or(FALLBACK_FILENAME));
            response.add_header(
                "cache-control",
                "private, no-store, no-cache, must-revalidate, max-age=0",
            )?;
            response.add_header("accept-ranges", "bytes")?;
            response.add_header(
                "content-disposition",
                format!("attachment; filename=\"{}\"", filename),
            )?;
        }

        Ok(response)
    }

    /// Build a bare response carrying only a status and reason
    pub fn error(&self, status: StatusCode, reason: &str) -> Response {
        self.make_response(status, reason)
    }

    /// Replace every run of non-whitelisted characters with a single dash
    pub fn sanitize_filename(&self, filename: &str) -> String {
        self.unsafe_runs.replace_all(filename, "-").into_owned()
    }

    fn make_response(&self, status: StatusCode, reason: &str) -> Response {
        Response::with_status(status).reason(reason)
    }
}

impl Default for FileResponseFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseFactory for FileResponseFactory {
    fn create_response(&self, status: StatusCode, reason: &str) -> Response {
        self.make_response(status, reason)
    }
}

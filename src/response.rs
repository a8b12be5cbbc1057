use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Url};
use tempfile::TempPath;

/// Status, headers and final URL of a completed exchange.
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// HTTP status code. Non-2xx values are delivered here, not as errors.
    pub status: StatusCode,
    /// Response headers as received
    pub headers: HeaderMap,
    /// URL of the final response, after any redirects the transport followed
    pub url: Url,
}

impl ResponseMetadata {
    /// Captures metadata from a `reqwest` response before its body is consumed.
    #[must_use]
    pub fn from_response(response: &reqwest::Response) -> Self {
        Self {
            status: response.status(),
            headers: response.headers().clone(),
            url: response.url().clone(),
        }
    }
}

/// Result of `get`, `post`, `put`, `upload` and `delete`.
#[derive(Debug, Clone)]
pub struct DataResponse {
    /// Response body, possibly empty
    pub body: Bytes,
    pub metadata: ResponseMetadata,
}

impl DataResponse {
    /// Returns the body as UTF-8 text, if it is valid UTF-8.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Result of `download`.
///
/// The body was streamed into a temporary file. The file is removed when
/// `location` is dropped; call [`TempPath::keep`] or [`TempPath::persist`] to
/// retain it.
#[derive(Debug)]
pub struct DownloadResponse {
    pub location: TempPath,
    pub metadata: ResponseMetadata,
}

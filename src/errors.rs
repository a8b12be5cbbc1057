use thiserror::Error;

/// Defines errors that can occur while building or sending a request.
///
/// A non-2xx status is not an error: the response is delivered as a normal
/// [`DataResponse`](crate::DataResponse) and the caller inspects
/// `metadata.status`.
///
/// # Example: Handling Errors In A Callback
///
/// ```ignore
/// helper.get(url, Params::new(), Headers::new(), |result| match result {
///     Ok(response) if response.metadata.status.is_success() => { /* ... */ }
///     Ok(response) => {
///         tracing::warn!("server answered {}", response.metadata.status);
///     }
///     Err(RequestError::Http(e)) => {
///         tracing::error!("transport failure: {e}");
///     }
///     Err(other) => tracing::error!("{other}"),
/// })?;
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RequestError {
    /// The URL (including any appended query string) could not be parsed.
    ///
    /// Reported synchronously when the request is built; the request is never
    /// submitted.
    #[error("Malformed URL '{url}': {reason}")]
    MalformedUrl {
        /// The URL exactly as it was handed to the parser
        url: String,
        /// Parser message
        reason: String,
    },
    /// Network, DNS or TLS failure reported by the HTTP client.
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    /// Local I/O failure, e.g. while writing a download to its temporary file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to build the helper.
    ///
    /// Occurs when no tokio runtime is available to run requests on, or when
    /// the underlying HTTP client cannot be constructed.
    #[error("Failed to build request helper: {0}")]
    ClientBuild(String),
}

impl RequestError {
    /// Returns `true` if the error was produced while the request was in
    /// flight, as opposed to while it was being built.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        match self {
            RequestError::Http(_) | RequestError::Io(_) => true,
            RequestError::MalformedUrl { .. } | RequestError::ClientBuild(_) => false,
        }
    }
}

use crate::errors::RequestError;
use crate::http::transport::{ReqwestTransport, Transport};
use crate::request::{Headers, Method, Params, Request, RequestBody, append_query};
use crate::response::{DataResponse, DownloadResponse};
use bytes::Bytes;
use reqwest::Client as ReqwestClient;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::debug;

/// Builds requests from a URL, headers and parameters and hands them to a
/// [`Transport`], delivering each outcome to a completion callback.
///
/// Every operation returns as soon as the request is built. The network
/// round-trip runs as a task on the helper's tokio runtime and its callback is
/// invoked exactly once, possibly on another thread. A malformed URL is
/// reported synchronously and the callback is never invoked.
///
/// The helper holds no per-request state; cloning it is cheap.
///
/// # Example
///
/// ```no_run
/// use media_storage_request::{Headers, Params, RequestHelper};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let helper = RequestHelper::builder().build()?;
///
/// let mut query = Params::new();
/// query.insert("limit".to_string(), "10".to_string());
///
/// helper.get("https://example.com/media", query, Headers::new(), |result| {
///     match result {
///         Ok(response) => println!("{}: {:?}", response.metadata.status, response.text()),
///         Err(e) => eprintln!("request failed: {e}"),
///     }
/// })?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RequestHelper {
    transport: Arc<dyn Transport>,
    runtime: Handle,
}

/// Builder for [`RequestHelper`] instances.
///
/// Unset options keep the transport's defaults: no timeout, the OS temporary
/// directory for downloads, and the runtime current at [`build`](Self::build).
#[derive(Debug, Default)]
pub struct RequestHelperBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    download_dir: Option<PathBuf>,
    runtime: Option<Handle>,
    http_client: Option<ReqwestClient>,
    transport: Option<Arc<dyn Transport>>,
}

impl RequestHelperBuilder {
    /// Sets the total request timeout of the default transport.
    ///
    /// Ignored when [`http_client`](Self::http_client) or
    /// [`transport`](Self::transport) is supplied.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout of the default transport.
    ///
    /// Ignored when [`http_client`](Self::http_client) or
    /// [`transport`](Self::transport) is supplied.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the directory downloads are written to.
    #[must_use]
    pub fn download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(dir.into());
        self
    }

    /// Runs requests on `runtime` instead of the runtime current at build time.
    #[must_use]
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Uses an existing `reqwest::Client` for the default transport.
    #[must_use]
    pub fn http_client(mut self, http_client: ReqwestClient) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Replaces the default transport entirely.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the `RequestHelper`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::ClientBuild`] if no runtime was given and none
    /// is current, or if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<RequestHelper, RequestError> {
        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|e| {
                RequestError::ClientBuild(format!("no tokio runtime available: {e}"))
            })?,
        };

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let http_client = match self.http_client {
                    Some(client) => client,
                    None => {
                        let mut builder = ReqwestClient::builder();
                        if let Some(timeout) = self.timeout {
                            builder = builder.timeout(timeout);
                        }
                        if let Some(connect_timeout) = self.connect_timeout {
                            builder = builder.connect_timeout(connect_timeout);
                        }
                        builder
                            .build()
                            .map_err(|e| RequestError::ClientBuild(e.to_string()))?
                    }
                };
                let download_dir = self.download_dir.unwrap_or_else(std::env::temp_dir);
                Arc::new(ReqwestTransport::new(http_client, download_dir))
            }
        };

        Ok(RequestHelper { transport, runtime })
    }
}

impl RequestHelper {
    /// Creates a new builder for `RequestHelper` instances.
    #[must_use]
    pub fn builder() -> RequestHelperBuilder {
        RequestHelperBuilder::default()
    }

    /// Issues a GET. Non-empty `query_params` are appended to `url` as
    /// `?k1=v1&k2=v2`, sorted by key and unescaped.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::MalformedUrl`] if the resulting URL cannot be
    /// parsed. The callback is not invoked in that case.
    pub fn get<F>(
        &self,
        url: &str,
        query_params: Params,
        headers: Headers,
        callback: F,
    ) -> Result<(), RequestError>
    where
        F: FnOnce(Result<DataResponse, RequestError>) + Send + 'static,
    {
        let url = append_query(url, &query_params);
        let request = Request::build(&url, Method::Get, headers, RequestBody::Empty)?;
        self.spawn_send(request, callback);
        Ok(())
    }

    /// Issues a POST whose body is the joined `form_params`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::MalformedUrl`] if `url` cannot be parsed.
    pub fn post<F>(
        &self,
        url: &str,
        headers: Headers,
        form_params: Params,
        callback: F,
    ) -> Result<(), RequestError>
    where
        F: FnOnce(Result<DataResponse, RequestError>) + Send + 'static,
    {
        let request = Request::build(url, Method::Post, headers, RequestBody::Form(form_params))?;
        self.spawn_send(request, callback);
        Ok(())
    }

    /// Issues a PUT whose body is `data` as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::MalformedUrl`] if `url` cannot be parsed.
    pub fn put<F>(
        &self,
        url: &str,
        headers: Headers,
        data: impl Into<String>,
        callback: F,
    ) -> Result<(), RequestError>
    where
        F: FnOnce(Result<DataResponse, RequestError>) + Send + 'static,
    {
        let request = Request::build(url, Method::Put, headers, RequestBody::Raw(data.into()))?;
        self.spawn_send(request, callback);
        Ok(())
    }

    /// Uploads `data` as the body of a POST.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::MalformedUrl`] if `url` cannot be parsed.
    pub fn upload<F>(
        &self,
        url: &str,
        headers: Headers,
        data: impl Into<Bytes>,
        callback: F,
    ) -> Result<(), RequestError>
    where
        F: FnOnce(Result<DataResponse, RequestError>) + Send + 'static,
    {
        let request = Request::build(url, Method::Post, headers, RequestBody::Empty)?;
        let data = data.into();
        let helper = self.clone();
        self.spawn(async move { callback(helper.execute_upload(request, data).await) });
        Ok(())
    }

    /// Downloads the response of a GET into a temporary file.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::MalformedUrl`] if `url` cannot be parsed.
    pub fn download<F>(&self, url: &str, headers: Headers, callback: F) -> Result<(), RequestError>
    where
        F: FnOnce(Result<DownloadResponse, RequestError>) + Send + 'static,
    {
        let request = Request::build(url, Method::Get, headers, RequestBody::Empty)?;
        let helper = self.clone();
        self.spawn(async move { callback(helper.execute_download(request).await) });
        Ok(())
    }

    /// Issues a DELETE with no body.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::MalformedUrl`] if `url` cannot be parsed.
    pub fn delete<F>(&self, url: &str, headers: Headers, callback: F) -> Result<(), RequestError>
    where
        F: FnOnce(Result<DataResponse, RequestError>) + Send + 'static,
    {
        let request = Request::build(url, Method::Delete, headers, RequestBody::Empty)?;
        self.spawn_send(request, callback);
        Ok(())
    }

    // --- Async round-trips ---

    /// Sends a prebuilt request and waits for the buffered response.
    ///
    /// # Errors
    ///
    /// Returns the transport's error unmodified.
    pub async fn execute(&self, request: Request) -> Result<DataResponse, RequestError> {
        debug!("Sending {} {}", request.method(), request.url());
        self.transport.send(request).await
    }

    /// Sends a prebuilt request with `data` as the streamed body.
    ///
    /// # Errors
    ///
    /// Returns the transport's error unmodified.
    pub async fn execute_upload(
        &self,
        request: Request,
        data: Bytes,
    ) -> Result<DataResponse, RequestError> {
        debug!(
            "Uploading {} bytes: {} {}",
            data.len(),
            request.method(),
            request.url()
        );
        self.transport.upload(request, data).await
    }

    /// Sends a prebuilt request and streams the response into a temporary file.
    ///
    /// # Errors
    ///
    /// Returns the transport's error unmodified.
    pub async fn execute_download(&self, request: Request) -> Result<DownloadResponse, RequestError> {
        debug!("Downloading {} {}", request.method(), request.url());
        self.transport.download(request).await
    }

    fn spawn_send<F>(&self, request: Request, callback: F)
    where
        F: FnOnce(Result<DataResponse, RequestError>) + Send + 'static,
    {
        let helper = self.clone();
        self.spawn(async move { callback(helper.execute(request).await) });
    }

    fn spawn(&self, task: impl Future<Output = ()> + Send + 'static) {
        // Fire and forget: the callback is the only completion signal.
        drop(self.runtime.spawn(task));
    }
}

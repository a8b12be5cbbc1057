use super::loud_wire;
use crate::errors::RequestError;
use crate::request::{Headers, Method, Request};
use crate::response::{DataResponse, DownloadResponse, ResponseMetadata};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::{Client as ReqwestClient, RequestBuilder, Url};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// The HTTP client a [`RequestHelper`](crate::RequestHelper) delegates to.
///
/// A transport performs exactly one network operation per call and reports
/// the outcome unmodified: non-2xx statuses are successful responses, and
/// failures are returned without retry or reclassification.
///
/// [`ReqwestTransport`] is the default. Hosts can supply their own, e.g. to
/// route requests through a platform client or to observe requests in tests.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Sends `request` with its own body and buffers the response body.
    async fn send(&self, request: Request) -> Result<DataResponse, RequestError>;

    /// Sends `request` with `data` streamed as the body. Any body already on
    /// `request` is ignored.
    async fn upload(&self, request: Request, data: Bytes) -> Result<DataResponse, RequestError>;

    /// Sends `request` and streams the response body into a temporary file.
    async fn download(&self, request: Request) -> Result<DownloadResponse, RequestError>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: ReqwestClient,
    download_dir: PathBuf,
}

impl ReqwestTransport {
    /// Creates a transport that writes downloads into `download_dir`.
    #[must_use]
    pub fn new(http_client: ReqwestClient, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            http_client,
            download_dir: download_dir.into(),
        }
    }

    /// Directory that receives downloaded files.
    #[must_use]
    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    fn request_builder(&self, method: Method, url: Url, headers: &Headers) -> RequestBuilder {
        headers.iter().fold(
            self.http_client.request(method.into(), url),
            |builder, (name, value)| builder.header(name.as_str(), value.as_str()),
        )
    }

    async fn dispatch(
        &self,
        request_id: usize,
        builder: RequestBuilder,
    ) -> Result<reqwest::Response, RequestError> {
        let response = builder.send().await.inspect_err(|e| {
            warn!("Request #{request_id} failed: {e}");
            loud_wire::log_failure(request_id, e);
        })?;

        debug!(
            "Request #{request_id} answered: status={}, url={}",
            response.status(),
            response.url()
        );
        loud_wire::log_response_status(request_id, response.status().as_u16());

        Ok(response)
    }

    async fn buffer(
        request_id: usize,
        response: reqwest::Response,
    ) -> Result<DataResponse, RequestError> {
        let metadata = ResponseMetadata::from_response(&response);
        let body = response.bytes().await?;

        loud_wire::log_response_body(request_id, &body);

        Ok(DataResponse { body, metadata })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> Result<DataResponse, RequestError> {
        let (url, method, headers, body) = request.into_parts();

        let request_id = loud_wire::next_request_id();
        debug!(
            "Request #{request_id}: {method} {url} ({} headers, body={} bytes)",
            headers.len(),
            body.as_ref().map_or(0, Bytes::len)
        );
        loud_wire::log_request(request_id, method.as_str(), url.as_str(), body.as_deref());

        let mut builder = self.request_builder(method, url, &headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = self.dispatch(request_id, builder).await?;
        Self::buffer(request_id, response).await
    }

    async fn upload(&self, request: Request, data: Bytes) -> Result<DataResponse, RequestError> {
        let (url, method, headers, _) = request.into_parts();

        let request_id = loud_wire::next_request_id();
        debug!(
            "Upload #{request_id}: {method} {url} ({} bytes)",
            data.len()
        );
        loud_wire::log_upload(request_id, url.as_str(), data.len());

        let builder = self.request_builder(method, url, &headers).body(data);

        let response = self.dispatch(request_id, builder).await?;
        Self::buffer(request_id, response).await
    }

    async fn download(&self, request: Request) -> Result<DownloadResponse, RequestError> {
        let (url, method, headers, _) = request.into_parts();

        let request_id = loud_wire::next_request_id();
        debug!("Download #{request_id}: {method} {url}");
        loud_wire::log_request(request_id, method.as_str(), url.as_str(), None);

        let builder = self.request_builder(method, url, &headers);
        let response = self.dispatch(request_id, builder).await?;
        let metadata = ResponseMetadata::from_response(&response);

        let (file, location) = tempfile::Builder::new()
            .prefix("download-")
            .tempfile_in(&self.download_dir)?
            .into_parts();
        let mut file = tokio::fs::File::from_std(file);

        // `location` removes the file if anything below fails.
        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!(
            "Download #{request_id} written: {} ({written} bytes)",
            location.display()
        );
        loud_wire::log_download_complete(request_id, &location, written);

        Ok(DownloadResponse { location, metadata })
    }
}

//! # media-storage-request
//!
//! Callback-style HTTP helpers for talking to a media storage service:
//! GET, POST, PUT, DELETE, upload and download.
//!
//! Each helper builds a [`Request`] from a URL, headers and parameters, hands it
//! to a [`Transport`] and delivers the outcome to a completion callback exactly
//! once. There is no retry, caching or authentication logic: status codes and
//! transport failures are passed through as received.
//!
//! ## Quick Start
//!
//! ```no_run
//! use media_storage_request::{Headers, Params, RequestHelper};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let helper = RequestHelper::builder().build()?;
//!
//! let mut form = Params::new();
//! form.insert("grant_type".to_string(), "password".to_string());
//!
//! helper.post("https://example.com/auth/token", Headers::new(), form, |result| {
//!     match result {
//!         Ok(response) => println!("status {}", response.metadata.status),
//!         Err(e) => eprintln!("transport error: {e}"),
//!     }
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Parameters
//!
//! Query and form parameters are joined as `k1=v1&k2=v2` in key order,
//! without percent-encoding. Callers that need escaping must escape values
//! themselves.
//!
//! ## Debugging
//!
//! Set `LOUD_WIRE=1` to print every request and response to stderr.

pub mod client;
pub mod errors;
pub(crate) mod http;
pub mod request;
pub mod response;


pub use client::{RequestHelper, RequestHelperBuilder};
pub use errors::RequestError;
pub use http::transport::{ReqwestTransport, Transport};
pub use request::{Headers, Method, Params, Request, RequestBody, join_params};
pub use response::{DataResponse, DownloadResponse, ResponseMetadata};

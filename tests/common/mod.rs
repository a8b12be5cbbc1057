//! Common test utilities shared across integration test files.
//!
//! Usage in test files:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! The local server echoes every request it does not route explicitly:
//! the body comes back verbatim and the method, URI and selected request
//! headers come back as `x-echo-*` response headers.

use axum::Router;
use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Redirect};
use axum::routing::get;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Upper bound for a single callback to arrive.
#[allow(dead_code)]
pub const TEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Size of the payload served at `/files/blob`.
#[allow(dead_code)]
pub const BLOB_SIZE: usize = 256 * 1024;

/// Deterministic payload served at `/files/blob`.
#[allow(dead_code)]
pub fn blob() -> Vec<u8> {
    (0..BLOB_SIZE).map(|i| (i % 251) as u8).collect()
}

/// Starts the test server on a random local port and returns its base URL.
#[allow(dead_code)]
pub async fn spawn_server() -> String {
    let app = Router::new()
        .route("/missing", get(missing))
        .route("/files/blob", get(serve_blob))
        .route("/redirect", get(|| async { Redirect::temporary("/files/blob") }))
        .fallback(echo);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });

    format!("http://{addr}")
}

/// Returns a base URL on which nothing is listening.
#[allow(dead_code)]
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    drop(listener);
    format!("http://{addr}")
}

/// Waits for a value delivered through a callback-fed oneshot channel.
///
/// # Panics
///
/// Panics if nothing arrives within [`TEST_TIMEOUT`] or the sender is dropped
/// without sending.
#[allow(dead_code)]
pub async fn wait_for<T>(rx: oneshot::Receiver<T>) -> T {
    tokio::time::timeout(TEST_TIMEOUT, rx)
        .await
        .expect("Callback did not fire before the timeout")
        .expect("Callback was dropped without being invoked")
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let mut echoed = HeaderMap::new();
    echoed.insert(
        "x-echo-method",
        HeaderValue::from_str(method.as_str()).expect("method is a valid header value"),
    );
    echoed.insert(
        "x-echo-uri",
        HeaderValue::from_str(&uri.to_string()).expect("uri is a valid header value"),
    );
    for (name, echo_name) in [
        ("x-media-token", "x-echo-media-token"),
        ("content-length", "x-echo-content-length"),
        ("content-type", "x-echo-content-type"),
    ] {
        if let Some(value) = headers.get(name) {
            echoed.insert(echo_name, value.clone());
        }
    }
    (StatusCode::OK, echoed, body)
}

async fn missing() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "not found")
}

async fn serve_blob() -> impl IntoResponse {
    blob()
}

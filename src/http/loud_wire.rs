//! Wire-level debugging via the `LOUD_WIRE` environment variable.
//!
//! When `LOUD_WIRE` is set to any value, every request and response passing
//! through [`ReqwestTransport`](crate::ReqwestTransport) is printed to stderr.
//!
//! ```bash
//! LOUD_WIRE=1 cargo test --test request_helper_tests -- --nocapture
//! ```
//!
//! - Green `>>>` for outgoing requests
//! - Red `<<<` for incoming responses
//! - UTC timestamps and request IDs for correlation
//!
//! JSON bodies are pretty-printed, other text is truncated and binary bodies
//! are summarized by size.

use colored::Colorize;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Request ID counter for correlating requests with responses
static REQUEST_COUNTER: AtomicUsize = AtomicUsize::new(1);

static ENABLED: OnceLock<bool> = OnceLock::new();

/// Text bodies longer than this are cut.
const BODY_PREVIEW_LENGTH: usize = 500;

/// Check if LOUD_WIRE debugging is enabled.
///
/// Cached after the first check: `LOUD_WIRE` must be set before the first
/// request is sent.
#[must_use]
pub fn is_enabled() -> bool {
    *ENABLED.get_or_init(|| std::env::var("LOUD_WIRE").is_ok())
}

/// Get the next request ID for correlation.
#[must_use]
pub fn next_request_id() -> usize {
    REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed)
}

fn prefix(request_id: usize) -> String {
    let ts = chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .dimmed();
    format!(
        "{} {} {}",
        "[LOUD_WIRE]".bold(),
        ts,
        format!("[REQ#{}]", request_id).cyan()
    )
}

/// Truncates to at most `max_len` bytes on a char boundary, adding "...".
fn truncate_for_display(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut cut = max_len;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &s[..cut])
}

/// Renders a body for display: pretty JSON, truncated text, or a size summary.
fn render_body(body: &[u8]) -> Vec<String> {
    let Ok(text) = std::str::from_utf8(body) else {
        return vec![format!("<{} bytes binary>", body.len())];
    };
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(parsed) => match serde_json::to_string_pretty(&parsed) {
            Ok(pretty) => pretty.lines().map(str::to_string).collect(),
            Err(_) => vec![truncate_for_display(text, BODY_PREVIEW_LENGTH)],
        },
        Err(_) => vec![truncate_for_display(text, BODY_PREVIEW_LENGTH)],
    }
}

/// Log an outgoing HTTP request.
pub fn log_request(request_id: usize, method: &str, url: &str, body: Option<&[u8]>) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    let direction = ">>>".green().bold();

    eprintln!("{prefix} {direction} {method} {url}");

    if let Some(body) = body.filter(|b| !b.is_empty()) {
        eprintln!("{prefix} {}:", "Body".green());
        for line in render_body(body) {
            eprintln!("{prefix} {line}");
        }
    }
}

/// Log an upload: the payload is never printed, only its size.
pub fn log_upload(request_id: usize, url: &str, size: usize) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    let direction = ">>>".green().bold();
    let size_kb = size as f64 / 1024.0;

    eprintln!(
        "{prefix} {direction} {} {url} ({size_kb:.2} KB)",
        "UPLOAD".green().bold()
    );
}

/// Log an incoming HTTP response status.
pub fn log_response_status(request_id: usize, status: u16) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    let direction = "<<<".red().bold();
    let status_text = if status < 300 {
        format!("{status} OK").green()
    } else {
        format!("{status} ERROR").red()
    };

    eprintln!("{prefix} {direction} {status_text}");
}

/// Log an incoming HTTP response body.
pub fn log_response_body(request_id: usize, body: &[u8]) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    eprintln!("{prefix} {}:", "Response".red());
    for line in render_body(body) {
        eprintln!("{prefix} {line}");
    }
}

/// Log where a download was written.
pub fn log_download_complete(request_id: usize, path: &std::path::Path, size: u64) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    let direction = "<<<".red().bold();

    eprintln!(
        "{prefix} {direction} {} {} ({size} bytes)",
        "DOWNLOADED".green().bold(),
        path.display()
    );
}

/// Log a transport failure.
pub fn log_failure(request_id: usize, error: &dyn std::fmt::Display) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    let direction = "<<<".red().bold();

    eprintln!("{prefix} {direction} {} {error}", "FAILED".red().bold());
}

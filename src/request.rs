//! Request construction.
//!
//! A [`Request`] is plain data: URL, method, headers and an optional body.
//! It is built fresh for every call, handed to a [`Transport`](crate::Transport)
//! exactly once and then dropped.

use crate::errors::RequestError;
use bytes::Bytes;
use reqwest::Url;
use std::collections::BTreeMap;
use std::fmt;

/// Header field name to value. Applied verbatim to the outgoing request.
pub type Headers = BTreeMap<String, String>;

/// Query or form parameters. The `BTreeMap` keeps serialization sorted by key.
pub type Params = BTreeMap<String, String>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Body source for [`Request::build`].
///
/// Exactly one variant applies, so there is no precedence question between
/// form parameters and a raw string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// No body at all.
    Empty,
    /// `join_params(params)` encoded as UTF-8.
    Form(Params),
    /// The string encoded as UTF-8.
    Raw(String),
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct Request {
    url: Url,
    method: Method,
    headers: Headers,
    body: Option<Bytes>,
}

impl Request {
    /// Builds a request, parsing `url`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::MalformedUrl`] if `url` cannot be parsed as an
    /// absolute URL.
    pub fn build(
        url: &str,
        method: Method,
        headers: Headers,
        body: RequestBody,
    ) -> Result<Self, RequestError> {
        let url = Url::parse(url).map_err(|e| RequestError::MalformedUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let body = match body {
            RequestBody::Empty => None,
            RequestBody::Form(params) => Some(Bytes::from(join_params(&params))),
            RequestBody::Raw(data) => Some(Bytes::from(data)),
        };

        Ok(Self {
            url,
            method,
            headers,
            body,
        })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Body bytes, if the request carries a body.
    #[must_use]
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Splits the request into its parts, consuming it.
    #[must_use]
    pub fn into_parts(self) -> (Url, Method, Headers, Option<Bytes>) {
        (self.url, self.method, self.headers, self.body)
    }
}

/// Joins parameters as `k1=v1&k2=v2`, sorted by key.
///
/// Keys and values are used verbatim: `=`, `&` and non-ASCII characters are not
/// escaped.
#[must_use]
pub fn join_params(params: &Params) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Appends `?` and the joined query parameters to `url`, or returns `url`
/// unchanged when there are none.
#[must_use]
pub fn append_query(url: &str, query_params: &Params) -> String {
    if query_params.is_empty() {
        url.to_string()
    } else {
        format!("{url}?{}", join_params(query_params))
    }
}

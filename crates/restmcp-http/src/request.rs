//! Per-call request parameters.

use std::collections::BTreeMap;
use std::time::Duration;

/// Parameters for one logical call.
///
/// The method is expected upper-cased and the URL non-empty; callers
/// validate both before handing the parameters to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParams {
    /// HTTP method, e.g. `GET`.
    pub method: String,
    /// Absolute URL, or a path starting with `/` when a base URL is configured.
    pub url: String,
    /// Per-call headers, overriding defaults with the same name.
    pub headers: BTreeMap<String, String>,
    /// Raw request body. `None` sends no body.
    pub body: Option<String>,
    /// Query parameters set onto the URL.
    pub query: BTreeMap<String, String>,
    /// Per-attempt deadline override. `None` or zero uses the engine default.
    pub timeout: Option<Duration>,
    /// Follow 3xx responses.
    pub follow_redirects: bool,
    /// Whether the caller wants response headers rendered.
    pub include_headers: bool,
}

impl RequestParams {
    /// Create parameters for a method and URL.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
            query: BTreeMap::new(),
            timeout: None,
            follow_redirects: true,
            include_headers: false,
        }
    }

    /// Shorthand for a `GET`.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    /// Add a per-call header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set a query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Override the per-attempt deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enable or disable redirect following.
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Ask for response headers in the rendered output.
    pub fn include_headers(mut self, include: bool) -> Self {
        self.include_headers = include;
        self
    }

    /// Body to send, if any. Empty bodies are not sent.
    pub fn body_bytes(&self) -> Option<&str> {
        self.body.as_deref().filter(|body| !body.is_empty())
    }
}

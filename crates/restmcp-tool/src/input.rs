//! Arguments accepted by the `http_request` tool.

use std::collections::BTreeMap;

use restmcp_http::RequestParams;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::duration::parse_duration;

/// Methods the tool accepts, matched case-insensitively.
pub const SUPPORTED_METHODS: [&str; 7] = ["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];

/// Raw tool arguments as sent by the client.
///
/// `method` and `url` default to empty so that a missing value surfaces as
/// a tool error from [`HttpRequestInput::into_params`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequestInput {
    /// HTTP method: GET, POST, PUT, PATCH, DELETE, HEAD or OPTIONS.
    #[serde(default)]
    pub method: String,
    /// Absolute URL, or a path when a base URL is configured.
    #[serde(default)]
    pub url: String,
    /// Request headers, overriding defaults with the same name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    /// Raw request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Query parameters added to the URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_params: Option<BTreeMap<String, String>>,
    /// Per-attempt timeout such as 10s or 500ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    /// Follow redirects (default true).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_redirects: Option<bool>,
    /// Include response headers in the output (default false).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_response_headers: Option<bool>,
}

/// Argument validation failures. Rendered to the caller as tool errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolInputError {
    #[error("method is required")]
    MissingMethod,

    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    #[error("url is required")]
    MissingUrl,

    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
}

impl HttpRequestInput {
    /// Validate the arguments and turn them into engine parameters.
    pub fn into_params(self) -> Result<RequestParams, ToolInputError> {
        let method = self.method.trim().to_ascii_uppercase();
        if method.is_empty() {
            return Err(ToolInputError::MissingMethod);
        }
        if !SUPPORTED_METHODS.contains(&method.as_str()) {
            return Err(ToolInputError::UnsupportedMethod(self.method));
        }

        if self.url.trim().is_empty() {
            return Err(ToolInputError::MissingUrl);
        }

        let timeout = match self.timeout.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_duration(raw).map_err(ToolInputError::InvalidTimeout)?),
        };

        let mut params = RequestParams::new(method, self.url)
            .follow_redirects(self.follow_redirects.unwrap_or(true))
            .include_headers(self.include_response_headers.unwrap_or(false));
        params.headers = self.headers.unwrap_or_default();
        params.query = self.query_params.unwrap_or_default();
        params.body = self.body;
        params.timeout = timeout;

        Ok(params)
    }
}

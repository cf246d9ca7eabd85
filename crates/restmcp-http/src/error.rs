//! Engine error taxonomy.

use std::time::Duration;

/// HTTP engine errors.
///
/// Non-2xx responses are not errors: they come back as [`crate::Response`]
/// values. Only failures that prevent a response from being produced or
/// captured end up here.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("invalid proxy URL {url}: {source}")]
    InvalidProxy {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("parsing URL {url}: {source}")]
    UrlParse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("creating request {method} {url}: {reason}")]
    RequestConstruction {
        method: String,
        url: String,
        reason: String,
    },

    #[error("executing {method} {url}: {source}")]
    Network {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("executing {method} {url}: timed out after {timeout:?}")]
    Timeout {
        method: String,
        url: String,
        timeout: Duration,
    },

    #[error("reading response body: {0}")]
    BodyRead(#[source] reqwest::Error),

    #[error("reading response body: timed out after {timeout:?}")]
    BodyReadTimeout { timeout: Duration },

    #[error("request cancelled")]
    Cancelled,
}

impl HttpError {
    /// Transport-level failure before any response was observed.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }

    /// Failure while draining a response that was already received.
    pub fn is_body_read(&self) -> bool {
        matches!(self, Self::BodyRead(_) | Self::BodyReadTimeout { .. })
    }

    /// Whether the error is a timeout, either on the round trip or the body.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::BodyReadTimeout { .. } => true,
            Self::Network { source, .. } | Self::BodyRead(source) => source.is_timeout(),
            _ => false,
        }
    }

    pub(crate) fn network(method: &str, url: &str, source: reqwest::Error) -> Self {
        Self::Network {
            method: method.to_string(),
            url: url.to_string(),
            source,
        }
    }

    pub(crate) fn construction(method: &str, url: &str, reason: impl Into<String>) -> Self {
        Self::RequestConstruction {
            method: method.to_string(),
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

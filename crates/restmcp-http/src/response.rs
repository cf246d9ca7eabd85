//! Captured HTTP responses.

use std::borrow::Cow;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;

use crate::body::LimitedBody;

/// One completed response, with its body capped at the engine's size limit.
#[derive(Debug, Clone)]
pub struct Response {
    /// Numeric status code.
    pub status: u16,
    /// Canonical reason phrase, empty for unknown codes.
    pub status_text: String,
    /// Response headers.
    pub headers: HeaderMap,
    /// Captured body bytes.
    pub body: Bytes,
    /// Wall-clock time of the attempt that produced this response.
    pub duration: Duration,
    /// Whether the body was cut at the size limit.
    pub truncated: bool,
    /// Best-effort size of the full body.
    pub original_size: u64,
}

impl Response {
    /// Assemble a response from its status, headers and captured body.
    pub fn new(status: u16, headers: HeaderMap, body: LimitedBody, duration: Duration) -> Self {
        Self {
            status,
            status_text: status_text(status).to_string(),
            headers,
            body: body.bytes,
            duration,
            truncated: body.truncated,
            original_size: body.original_size,
        }
    }

    /// A response with a fully captured body and no headers.
    pub fn from_status(status: u16, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        let original_size = body.len() as u64;
        Self::new(
            status,
            HeaderMap::new(),
            LimitedBody {
                bytes: body,
                truncated: false,
                original_size,
            },
            Duration::ZERO,
        )
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the status is 4xx.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Whether the status is 5xx.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// First value of a header, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Canonical reason phrase for a status code.
pub fn status_text(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("")
}

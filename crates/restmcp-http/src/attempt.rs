//! A single request/response round trip.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::body::read_limited;
use crate::config::EngineConfig;
use crate::error::HttpError;
use crate::headers::{resolve_headers, InvalidHeader};
use crate::request::RequestParams;
use crate::response::Response;
use crate::url_builder::build_url;

/// The outgoing request, resolved once per call and replayed per attempt.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// HTTP method.
    pub method: Method,
    /// Fully resolved URL, query parameters included.
    pub url: Url,
    /// Merged default and per-call headers.
    pub headers: HeaderMap,
    /// Raw body, absent when nothing is sent.
    pub body: Option<Bytes>,
}

impl PreparedRequest {
    /// Resolve URL, method, headers and body for a call.
    pub fn from_params(config: &EngineConfig, params: &RequestParams) -> Result<Self, HttpError> {
        let url = build_url(config.base_url(), &params.url, &params.query)?;

        let method = Method::from_bytes(params.method.as_bytes()).map_err(|_| {
            HttpError::construction(&params.method, url.as_str(), "invalid HTTP method")
        })?;

        let headers = resolve_headers(&config.default_headers, &params.headers)
            .map_err(|InvalidHeader(reason)| HttpError::construction(&params.method, url.as_str(), reason))?;

        let body = params
            .body_bytes()
            .map(|body| Bytes::copy_from_slice(body.as_bytes()));

        Ok(Self {
            method,
            url,
            headers,
            body,
        })
    }
}

/// Runs exactly one round trip against one transport.
#[derive(Debug, Clone)]
pub struct AttemptRunner<'a> {
    client: &'a Client,
    max_response_size: usize,
    timeout: Option<Duration>,
}

impl<'a> AttemptRunner<'a> {
    /// Create a runner. `timeout` is the deadline for each attempt.
    pub fn new(client: &'a Client, max_response_size: usize, timeout: Option<Duration>) -> Self {
        Self {
            client,
            max_response_size,
            timeout,
        }
    }

    /// Send the request and capture the response body.
    ///
    /// The deadline starts fresh on every call and covers both the round
    /// trip and the body read.
    pub async fn run(
        &self,
        request: &PreparedRequest,
        cancel: &CancellationToken,
    ) -> Result<Response, HttpError> {
        let method = request.method.as_str();
        let url = request.url.as_str();
        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let start = Instant::now();
        let sent = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(HttpError::Cancelled),
            sent = within(deadline, builder.send()) => sent,
        };
        let duration = start.elapsed();

        let response = match sent {
            Some(Ok(response)) => response,
            Some(Err(source)) => {
                tracing::debug!(method, url, elapsed_ms = duration.as_millis() as u64, error = %source, "attempt failed");
                return Err(HttpError::network(method, url, source));
            }
            None => {
                tracing::debug!(method, url, elapsed_ms = duration.as_millis() as u64, "attempt timed out");
                return Err(HttpError::Timeout {
                    method: method.to_string(),
                    url: url.to_string(),
                    timeout: self.timeout.unwrap_or_default(),
                });
            }
        };

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let declared_length = response.content_length();
        tracing::debug!(method, url, status, elapsed_ms = duration.as_millis() as u64, "received response");

        let read = read_limited(Box::pin(response.bytes_stream()), self.max_response_size, declared_length);
        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(HttpError::Cancelled),
            body = within(deadline, read) => body,
        };

        let body = match body {
            Some(Ok(body)) => body,
            Some(Err(source)) => return Err(HttpError::BodyRead(source)),
            None => {
                return Err(HttpError::BodyReadTimeout {
                    timeout: self.timeout.unwrap_or_default(),
                })
            }
        };

        if body.truncated {
            tracing::debug!(
                captured = body.bytes.len(),
                original_size = body.original_size,
                "response body truncated"
            );
        }

        Ok(Response::new(status, headers, body, duration))
    }
}

/// Await `future` until `deadline`. `None` means the deadline passed.
async fn within<F: Future>(deadline: Option<Instant>, future: F) -> Option<F::Output> {
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, future).await.ok(),
        None => Some(future.await),
    }
}

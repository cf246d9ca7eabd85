//! Engine configuration.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Proxy};

use crate::error::HttpError;
use crate::redirect::RedirectPolicy;

/// Body cap applied when no positive size is configured.
pub const DEFAULT_MAX_RESPONSE_SIZE: usize = 51_200;

/// Connection-level configuration, fixed for the lifetime of an engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Prefix for request URLs that start with `/`.
    pub base_url: Option<String>,
    /// Headers sent with every request unless overridden per call.
    pub default_headers: BTreeMap<String, String>,
    /// Default per-attempt deadline. Zero disables the deadline.
    pub timeout: Duration,
    /// Byte cap for captured response bodies. Zero selects the default.
    pub max_response_size: usize,
    /// Outbound proxy for all requests.
    pub proxy_url: Option<String>,
    /// Retries after the first attempt.
    pub retry_count: u32,
    /// Fixed wait between attempts.
    pub retry_delay: Duration,
    /// Skip TLS certificate verification.
    pub insecure_tls: bool,
    /// Treat body-read failures like network failures in the retry loop.
    /// Enabled by default; disable to surface truncated bodies immediately.
    pub retry_body_read_errors: bool,
    /// User agent string.
    pub user_agent: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            default_headers: BTreeMap::new(),
            timeout: Duration::from_secs(30),
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
            proxy_url: None,
            retry_count: 0,
            retry_delay: Duration::from_millis(1000),
            insecure_tls: false,
            retry_body_read_errors: true,
            user_agent: format!("rest-api-mcp/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl EngineConfig {
    /// Effective body cap.
    pub fn max_response_size(&self) -> usize {
        if self.max_response_size == 0 {
            DEFAULT_MAX_RESPONSE_SIZE
        } else {
            self.max_response_size
        }
    }

    /// Configured base URL, ignoring an empty string.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref().filter(|base| !base.is_empty())
    }

    /// Deadline for one attempt: the per-call override when non-zero, else
    /// the engine default. `None` means no deadline at all.
    pub fn effective_timeout(&self, per_call: Option<Duration>) -> Option<Duration> {
        per_call
            .filter(|timeout| !timeout.is_zero())
            .or(Some(self.timeout))
            .filter(|timeout| !timeout.is_zero())
    }
}

/// Build a transport for the given redirect policy.
///
/// Deadlines are enforced per attempt by the engine, so no client-wide
/// timeout is set here.
pub fn build_client(config: &EngineConfig, redirect: RedirectPolicy) -> Result<Client, HttpError> {
    let mut builder = ClientBuilder::new()
        .user_agent(&config.user_agent)
        .redirect(redirect.to_reqwest());

    if let Some(proxy_url) = config.proxy_url.as_deref().filter(|p| !p.is_empty()) {
        let proxy = Proxy::all(proxy_url).map_err(|source| HttpError::InvalidProxy {
            url: proxy_url.to_string(),
            source,
        })?;
        builder = builder.proxy(proxy);
    }

    if config.insecure_tls {
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder.build().map_err(HttpError::ClientBuild)
}

//! The request-execution engine.

use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::attempt::{AttemptRunner, PreparedRequest};
use crate::config::EngineConfig;
use crate::error::HttpError;
use crate::redirect::{RedirectPolicy, Transports};
use crate::request::RequestParams;
use crate::response::Response;
use crate::retry::RetryController;

/// Executes logical HTTP calls with bounded capture and retries.
///
/// The underlying connection pools are shared between calls. Per-call
/// settings (headers, timeout, redirect policy) never touch shared state,
/// so one engine can be used from several tasks at once.
#[derive(Debug, Clone)]
pub struct HttpEngine {
    config: EngineConfig,
    transports: Transports,
    retry: RetryController,
}

impl HttpEngine {
    /// Build an engine with default configuration.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(EngineConfig::default())
    }

    /// Build an engine from a configuration.
    pub fn with_config(config: EngineConfig) -> Result<Self, HttpError> {
        let transports = Transports::new(&config)?;
        let retry = RetryController::new(config.retry_count, config.retry_delay)
            .retry_body_read_errors(config.retry_body_read_errors);
        Ok(Self {
            config,
            transports,
            retry,
        })
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Execute one call.
    pub async fn execute(&self, params: &RequestParams) -> Result<Response, HttpError> {
        self.execute_with_cancel(params, &CancellationToken::new()).await
    }

    /// Execute one call, aborting as soon as `cancel` fires.
    pub async fn execute_with_cancel(
        &self,
        params: &RequestParams,
        cancel: &CancellationToken,
    ) -> Result<Response, HttpError> {
        let span = tracing::debug_span!("http_call", method = %params.method, url = %params.url);
        self.execute_inner(params, cancel).instrument(span).await
    }

    async fn execute_inner(
        &self,
        params: &RequestParams,
        cancel: &CancellationToken,
    ) -> Result<Response, HttpError> {
        let request = PreparedRequest::from_params(&self.config, params)?;
        let client = self
            .transports
            .for_policy(RedirectPolicy::from_follow(params.follow_redirects));
        let runner = AttemptRunner::new(
            client,
            self.config.max_response_size(),
            self.config.effective_timeout(params.timeout),
        );

        let result = self
            .retry
            .run(cancel, |attempt| {
                tracing::debug!(attempt, url = %request.url, "starting attempt");
                runner.run(&request, cancel)
            })
            .await;

        match &result {
            Ok(response) => tracing::debug!(
                status = response.status,
                bytes = response.body.len(),
                truncated = response.truncated,
                "call completed"
            ),
            Err(err) => tracing::warn!(error = %err, "call failed"),
        }
        result
    }
}

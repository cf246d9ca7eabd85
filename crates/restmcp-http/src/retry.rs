//! Retry state machine.
//!
//! A call moves through `Attempting(0..=retry_count)` and ends in either
//! `Succeeded` (a response is returned, whatever its status) or
//! `FailedFinal` (the last attempt's error is returned). Only network
//! failures and 5xx responses move to the next attempt; 4xx and every
//! other status end the call immediately.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::HttpError;
use crate::response::Response;

/// Where a call currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// Running the attempt with this zero-based index.
    Attempting(u32),
    /// A response was selected for the caller.
    Succeeded,
    /// The terminal error was selected for the caller.
    FailedFinal,
}

/// What the controller does with one attempt's outcome.
#[derive(Debug)]
pub enum Decision {
    /// Wait the retry delay, then run the next attempt.
    Retry,
    /// Return this response.
    Succeed(Response),
    /// Return this error.
    Fail(HttpError),
}

impl Decision {
    /// State the call moves to after this decision.
    pub fn next_state(&self, attempt: u32) -> RetryState {
        match self {
            Self::Retry => RetryState::Attempting(attempt + 1),
            Self::Succeed(_) => RetryState::Succeeded,
            Self::Fail(_) => RetryState::FailedFinal,
        }
    }
}

/// Drives up to `retry_count + 1` attempts with a fixed delay in between.
#[derive(Debug, Clone)]
pub struct RetryController {
    retry_count: u32,
    retry_delay: Duration,
    retry_body_read_errors: bool,
}

impl RetryController {
    /// Create a controller.
    pub fn new(retry_count: u32, retry_delay: Duration) -> Self {
        Self {
            retry_count,
            retry_delay,
            retry_body_read_errors: true,
        }
    }

    /// Whether failures while draining a response body are retried. On by default.
    pub fn retry_body_read_errors(mut self, enabled: bool) -> Self {
        self.retry_body_read_errors = enabled;
        self
    }

    /// Total attempts a call may make.
    pub fn max_attempts(&self) -> u32 {
        self.retry_count.saturating_add(1)
    }

    /// Classify the outcome of attempt `attempt`.
    pub fn decide(&self, attempt: u32, outcome: Result<Response, HttpError>) -> Decision {
        let has_next = attempt < self.retry_count;
        match outcome {
            Ok(response) if (500..600).contains(&response.status) && has_next => {
                tracing::debug!(attempt, status = response.status, "server error, will retry");
                Decision::Retry
            }
            Ok(response) => Decision::Succeed(response),
            Err(err) if has_next && self.is_retryable(&err) => {
                tracing::debug!(attempt, error = %err, "attempt failed, will retry");
                Decision::Retry
            }
            Err(err) => Decision::Fail(err),
        }
    }

    fn is_retryable(&self, err: &HttpError) -> bool {
        err.is_network() || (self.retry_body_read_errors && err.is_body_read())
    }

    /// Run attempts until the state machine reaches a terminal state.
    ///
    /// `attempt_fn` receives the attempt index. Cancelling `cancel` aborts
    /// the inter-attempt wait; the attempt itself is expected to observe
    /// the same token.
    pub async fn run<F, Fut>(&self, cancel: &CancellationToken, mut attempt_fn: F) -> Result<Response, HttpError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Response, HttpError>>,
    {
        let mut attempt = 0;
        loop {
            if cancel.is_cancelled() {
                return Err(HttpError::Cancelled);
            }

            let decision = self.decide(attempt, attempt_fn(attempt).await);
            let next = decision.next_state(attempt);
            tracing::trace!(attempt, ?next, "retry state transition");

            match decision {
                Decision::Succeed(response) => return Ok(response),
                Decision::Fail(err) => return Err(err),
                Decision::Retry => {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(HttpError::Cancelled),
                        _ = tokio::time::sleep(self.retry_delay) => {}
                    }
                    attempt += 1;
                }
            }
        }
    }
}

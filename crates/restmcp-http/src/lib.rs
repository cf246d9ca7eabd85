//! Request-execution engine for rest-api-mcp.
//!
//! Turns declarative [`RequestParams`] into one completed [`Response`]:
//! URLs are resolved against an optional base, default and per-call
//! headers are merged, each attempt runs under its own deadline, bodies
//! are captured up to a byte ceiling, and network failures or 5xx
//! responses are retried a bounded number of times.

pub mod attempt;
pub mod body;
pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod redirect;
pub mod request;
pub mod response;
pub mod retry;
pub mod url_builder;

pub use client::HttpEngine;
pub use config::{EngineConfig, DEFAULT_MAX_RESPONSE_SIZE};
pub use error::HttpError;
pub use headers::parse_headers;
pub use redirect::RedirectPolicy;
pub use request::RequestParams;
pub use response::Response;
pub use retry::{Decision, RetryController, RetryState};

pub use reqwest;
pub use tokio_util::sync::CancellationToken;

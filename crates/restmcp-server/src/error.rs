//! Server errors.

use thiserror::Error;

/// Failures that stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("MCP initialization failed: {0}")]
    Initialize(String),

    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

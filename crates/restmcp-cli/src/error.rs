//! CLI error handling.

use std::process::ExitCode;

use restmcp_server::ServerError;
use thiserror::Error;

use crate::Exit;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("server stopped: {0}")]
    Server(#[from] ServerError),

    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl CliError {
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Exit status for this error.
    pub fn exit(&self) -> Exit {
        match self {
            Self::Config { .. } => Exit::ConfigError,
            Self::Server(_) | Self::Runtime(_) => Exit::GeneralError,
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        self.exit().into()
    }

    /// Message with its source chain, for stderr.
    pub fn report(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            let text = err.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = err.source();
        }
        message
    }
}

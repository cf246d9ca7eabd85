use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Registration failures.
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("missing scope (expected \"project\" or \"user\")")]
    MissingScope,

    #[error("unknown scope {0:?} (expected \"project\" or \"user\")")]
    UnknownScope(String),

    #[error("detecting binary path: {0}")]
    BinaryPath(#[source] io::Error),

    #[error("resolving config path: home directory not found")]
    NoHomeDir,

    #[error("resolving config path: {0}")]
    CurrentDir(#[source] io::Error),

    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("parsing {}: top-level value is not an object", path.display())]
    NotAnObject { path: PathBuf },

    #[error("writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RegisterError {
    /// Whether the usage text should accompany this error.
    pub fn wants_usage(&self) -> bool {
        matches!(self, Self::MissingScope | Self::UnknownScope(_))
    }
}

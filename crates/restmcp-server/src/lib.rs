//! MCP server exposing the `http_request` tool over stdin and stdout.

pub mod error;
pub mod server;

pub use error::ServerError;
pub use server::{serve, serve_stdio};

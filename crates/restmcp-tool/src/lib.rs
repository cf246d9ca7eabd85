//! The `http_request` tool: argument validation, description, rendering of
//! engine responses as text, and the MCP handler that serves it.

pub mod description;
pub mod duration;
pub mod format;
pub mod handler;
pub mod input;

pub use description::build_description;
pub use duration::parse_duration;
pub use format::format_response;
pub use handler::{HttpRequestTool, SERVER_NAME, TOOL_NAME};
pub use input::{HttpRequestInput, ToolInputError, SUPPORTED_METHODS};

//! The `http_request` tool and the MCP server handler that exposes it.

use std::borrow::Cow;

use restmcp_http::{CancellationToken, HttpEngine};
use restmcp_log::spans::{record_error, rpc_span, tool_call_span, Timer};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo, Tool};
use rmcp::service::RequestContext;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler};
use tracing::Instrument;

use crate::description::build_description;
use crate::format::format_response;
use crate::input::HttpRequestInput;

/// Name under which the tool is advertised.
pub const TOOL_NAME: &str = "http_request";

/// Name reported in `serverInfo` during initialization.
pub const SERVER_NAME: &str = "rest-api-mcp";

/// Executes HTTP requests through an [`HttpEngine`].
#[derive(Clone)]
pub struct HttpRequestTool {
    tool_router: ToolRouter<Self>,
    engine: HttpEngine,
}

#[tool_router]
impl HttpRequestTool {
    pub fn new(engine: HttpEngine) -> Self {
        let mut tool_router = Self::tool_router();
        // The advertised description depends on the engine configuration.
        if let Some(route) = tool_router.map.get_mut(TOOL_NAME) {
            route.attr.description = Cow::<'static, str>::Owned(build_description(engine.config())).into();
        }
        Self { tool_router, engine }
    }

    #[tool(description = "Make HTTP requests.")]
    async fn http_request(
        &self,
        Parameters(input): Parameters<HttpRequestInput>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let id = context.id.to_string();
        let result = self
            .handle(input, &context.ct)
            .instrument(rpc_span("tools/call", Some(&id)))
            .await;
        Ok(result)
    }
}

impl HttpRequestTool {
    pub fn engine(&self) -> &HttpEngine {
        &self.engine
    }

    /// Tools advertised in `tools/list`.
    pub fn tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    /// Validate, execute and render one request.
    ///
    /// Validation and transport failures come back as error results, never
    /// as protocol errors. Cancelling `cancel` aborts the in-flight attempt.
    pub async fn handle(&self, input: HttpRequestInput, cancel: &CancellationToken) -> CallToolResult {
        let span = tool_call_span(TOOL_NAME);
        let timer = Timer::start("tools/call");

        let result = self.execute(input, cancel).instrument(span.clone()).await;

        span.record("is_error", result.is_error.unwrap_or(false));
        span.in_scope(|| timer.finish());
        result
    }

    async fn execute(&self, input: HttpRequestInput, cancel: &CancellationToken) -> CallToolResult {
        let params = match input.into_params() {
            Ok(params) => params,
            Err(err) => {
                tracing::debug!(error = %err, "rejected tool arguments");
                return CallToolResult::error(vec![Content::text(err.to_string())]);
            }
        };

        match self.engine.execute_with_cancel(&params, cancel).await {
            Ok(response) => CallToolResult::success(vec![Content::text(format_response(
                &response,
                params.include_headers,
            ))]),
            Err(err) => {
                record_error(&err);
                CallToolResult::error(vec![Content::text(format!("Request failed: {err}"))])
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for HttpRequestTool {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restmcp_http::EngineConfig;

    fn tool(config: EngineConfig) -> HttpRequestTool {
        HttpRequestTool::new(HttpEngine::with_config(config).unwrap())
    }

    fn text(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|content| content.as_text())
            .map(|content| content.text.clone())
            .collect()
    }

    #[test]
    fn test_definition() {
        let tools = tool(EngineConfig {
            base_url: Some("http://localhost:3000".into()),
            ..Default::default()
        })
        .tools();

        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, TOOL_NAME);
        let description = tools[0].description.as_deref().unwrap_or_default();
        assert!(description.starts_with("Make HTTP requests. Use instead of curl"));
        assert!(description.contains("Base URL: http://localhost:3000"));

        let schema = &tools[0].input_schema;
        assert_eq!(schema.get("type").and_then(|t| t.as_str()), Some("object"));
        let properties = schema.get("properties").and_then(|p| p.as_object()).unwrap();
        for field in ["method", "url", "headers", "body", "queryParams", "timeout", "followRedirects", "includeResponseHeaders"] {
            assert!(properties.contains_key(field), "missing {field}");
        }
    }

    #[test]
    fn test_server_info() {
        let info = tool(EngineConfig::default()).get_info();
        assert_eq!(info.server_info.name, "rest-api-mcp");
        assert!(info.capabilities.tools.is_some());
    }

    #[tokio::test]
    async fn test_validation_failure_is_tool_error() {
        let input = HttpRequestInput {
            url: "/x".into(),
            ..Default::default()
        };
        let result = tool(EngineConfig::default()).handle(input, &CancellationToken::new()).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text(&result), "method is required");
    }

    #[tokio::test]
    async fn test_engine_failure_is_tool_error() {
        let input = HttpRequestInput {
            method: "GET".into(),
            url: "/relative-without-base".into(),
            ..Default::default()
        };
        let result = tool(EngineConfig::default()).handle(input, &CancellationToken::new()).await;
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).starts_with("Request failed: "));
    }
}

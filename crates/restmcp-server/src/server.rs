//! Serving the tool over a byte stream.

use restmcp_http::CancellationToken;
use restmcp_tool::HttpRequestTool;
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::ServerError;

/// Serve on the process's stdin and stdout until EOF or `shutdown`.
pub async fn serve_stdio(tool: HttpRequestTool, shutdown: CancellationToken) -> Result<(), ServerError> {
    let (stdin, stdout) = stdio();
    serve(tool, stdin, stdout, shutdown).await
}

/// Serve line-delimited JSON-RPC until the peer closes `reader` or
/// `shutdown` fires.
///
/// Requests run concurrently. A `notifications/cancelled` from the client
/// cancels the request context of the named call, which aborts its
/// in-flight HTTP attempt.
pub async fn serve<R, W>(
    tool: HttpRequestTool,
    reader: R,
    writer: W,
    shutdown: CancellationToken,
) -> Result<(), ServerError>
where
    R: AsyncRead + Send + Unpin + 'static,
    W: AsyncWrite + Send + Unpin + 'static,
{
    tracing::info!(tools = tool.tools().len(), "server starting");

    let running = match tool.serve_with_ct((reader, writer), shutdown.clone()).await {
        Ok(running) => running,
        Err(_) if shutdown.is_cancelled() => {
            tracing::info!("shutdown requested before initialization");
            return Ok(());
        }
        Err(e) => return Err(ServerError::Initialize(e.to_string())),
    };

    let reason = running.waiting().await?;
    tracing::info!(?reason, "server stopped");
    Ok(())
}

//! rest-api-mcp: an MCP server for making HTTP requests.
//!
//! Main entry point for the `rest-api-mcp` binary.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use restmcp_http::{CancellationToken, HttpEngine};
use restmcp_tool::HttpRequestTool;

mod cli;
mod error;

use cli::Cli;
use error::CliError;

/// Application exit codes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success = 0,
    GeneralError = 1,
    /// Bad flags or environment; same code clap uses for usage errors.
    ConfigError = 2,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("register") {
        return register(&args);
    }

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => Exit::Success.into(),
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("Error: {}", e.report());
            e.exit_code()
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    restmcp_log::init(cli.log_config()).map_err(|e| CliError::config("failed to initialize logging", e))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    let result = runtime.block_on(serve(cli));
    // Do not wait on a blocked stdin read.
    runtime.shutdown_timeout(Duration::from_millis(500));
    result
}

async fn serve(cli: Cli) -> Result<(), CliError> {
    let engine = HttpEngine::with_config(cli.engine_config())
        .map_err(|e| CliError::config("invalid HTTP configuration", e))?;
    let tool = HttpRequestTool::new(engine);

    let shutdown = CancellationToken::new();
    let interrupt = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received");
            interrupt.cancel();
        }
    });

    restmcp_server::serve_stdio(tool, shutdown).await?;
    Ok(())
}

fn register(args: &[String]) -> ExitCode {
    let bin = args
        .first()
        .and_then(|path| std::path::Path::new(path).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "rest-api-mcp".to_string());

    match restmcp_register::run(restmcp_register::SERVER_NAME, &args[2..]) {
        Ok((name, path)) => {
            println!("Registered {name:?} in {}", path.display());
            Exit::Success.into()
        }
        Err(e) => {
            eprintln!("Error: {e}");
            if e.wants_usage() {
                eprint!("{}", restmcp_register::usage(&bin));
            }
            Exit::GeneralError.into()
        }
    }
}

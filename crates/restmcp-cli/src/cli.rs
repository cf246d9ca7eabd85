//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueHint};
use restmcp_http::{parse_headers, EngineConfig, DEFAULT_MAX_RESPONSE_SIZE};
use restmcp_log::{LogConfig, LogLevel};
use restmcp_tool::parse_duration;

/// MCP server exposing an `http_request` tool over stdio.
#[derive(Debug, Parser)]
#[command(
    name = "rest-api-mcp",
    version,
    about,
    long_about = None,
    after_help = "Register with an MCP client:\n  \
                  rest-api-mcp register project [directory] [-- args...]\n  \
                  rest-api-mcp register user [-- args...]"
)]
pub struct Cli {
    #[arg(
        long,
        env = "REST_API_MCP_BASE_URL",
        value_hint = ValueHint::Url,
        help = "Base URL prepended to relative URLs"
    )]
    pub base_url: Option<String>,

    #[arg(
        long = "default-header",
        value_name = "NAME: VALUE",
        env = "REST_API_MCP_DEFAULT_HEADERS",
        value_delimiter = '\n',
        help = "Default header sent with every request (repeatable)"
    )]
    pub default_headers: Vec<String>,

    #[arg(
        long,
        env = "REST_API_MCP_TIMEOUT",
        default_value = "30s",
        value_parser = parse_duration,
        help = "Per-attempt request timeout"
    )]
    pub timeout: Duration,

    #[arg(
        long,
        env = "REST_API_MCP_MAX_RESPONSE_SIZE",
        default_value_t = DEFAULT_MAX_RESPONSE_SIZE,
        help = "Maximum response body size in bytes"
    )]
    pub max_response_size: usize,

    #[arg(long, env = "REST_API_MCP_PROXY", value_hint = ValueHint::Url, help = "HTTP/HTTPS proxy URL")]
    pub proxy: Option<String>,

    #[arg(
        long,
        env = "REST_API_MCP_RETRY",
        default_value_t = 0,
        help = "Number of retries for failed requests"
    )]
    pub retry: u32,

    #[arg(
        long,
        env = "REST_API_MCP_RETRY_DELAY",
        default_value = "1000ms",
        value_parser = parse_duration,
        help = "Delay between retries"
    )]
    pub retry_delay: Duration,

    #[arg(long, env = "REST_API_MCP_INSECURE", help = "Skip TLS certificate verification")]
    pub insecure: bool,

    #[arg(long, env = "REST_API_MCP_LOG_ENABLED", help = "Enable logging")]
    pub log_enabled: bool,

    #[arg(
        long,
        env = "REST_API_MCP_LOG_FILE",
        value_hint = ValueHint::FilePath,
        help = "Log file path (stderr if empty)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        env = "REST_API_MCP_LOG_LEVEL",
        help = "Log level (trace/debug/info/warn/error) [default: info]"
    )]
    pub log_level: Option<LogLevel>,
}

impl Cli {
    /// Engine settings from the flags.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            base_url: non_empty(self.base_url.as_deref()),
            default_headers: parse_headers(self.default_headers.as_slice()),
            timeout: self.timeout,
            max_response_size: self.max_response_size,
            proxy_url: non_empty(self.proxy.as_deref()),
            retry_count: self.retry,
            retry_delay: self.retry_delay,
            insecure_tls: self.insecure,
            ..Default::default()
        }
    }

    /// Logging settings: `RESTMCP_LOG_*` variables, then the flags.
    pub fn log_config(&self) -> LogConfig {
        let mut config = LogConfig::from_env();
        if self.log_enabled {
            config.enabled = true;
        }
        if let Some(level) = self.log_level {
            config.level = level;
        }
        if let Some(path) = self.log_file.as_ref().filter(|p| !p.as_os_str().is_empty()) {
            config.file_path = Some(path.clone());
        }
        config
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["rest-api-mcp"]).unwrap();
        let config = cli.engine_config();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_response_size, 51_200);
        assert_eq!(config.retry_count, 0);
        assert_eq!(config.retry_delay, Duration::from_millis(1000));
        assert!(!config.insecure_tls);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "rest-api-mcp",
            "--base-url",
            "http://localhost:8080",
            "--default-header",
            "Authorization: Bearer t",
            "--default-header",
            "Accept: application/json",
            "--timeout",
            "5s",
            "--max-response-size",
            "1024",
            "--proxy",
            "http://proxy:3128",
            "--retry",
            "2",
            "--retry-delay",
            "250ms",
            "--insecure",
            "--log-level",
            "debug",
        ])
        .unwrap();

        let config = cli.engine_config();
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.default_headers.len(), 2);
        assert_eq!(config.default_headers["Authorization"], "Bearer t");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_response_size, 1024);
        assert_eq!(config.proxy_url.as_deref(), Some("http://proxy:3128"));
        assert_eq!(config.retry_count, 2);
        assert_eq!(config.retry_delay, Duration::from_millis(250));
        assert!(config.insecure_tls);
        assert_eq!(cli.log_config().level, LogLevel::Debug);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let cli = Cli::try_parse_from(["rest-api-mcp", "--base-url", "", "--proxy", " "]).unwrap();
        let config = cli.engine_config();
        assert!(config.base_url.is_none());
        assert!(config.proxy_url.is_none());
    }

    #[test]
    fn test_invalid_values() {
        assert!(Cli::try_parse_from(["rest-api-mcp", "--timeout", "soon"]).is_err());
        assert!(Cli::try_parse_from(["rest-api-mcp", "--retry", "-1"]).is_err());
        assert!(Cli::try_parse_from(["rest-api-mcp", "--log-level", "loud"]).is_err());
    }
}

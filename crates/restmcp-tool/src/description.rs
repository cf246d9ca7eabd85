//! Tool description.

use restmcp_http::EngineConfig;

const BASE_DESCRIPTION: &str = "Make HTTP requests. Use instead of curl for reliable cross-platform HTTP calls. \
Supports all methods, headers, body, query params, redirects, and timeout.";

/// Header names whose values never appear in the description.
const SENSITIVE_HEADERS: [&str; 4] = ["authorization", "proxy-authorization", "x-api-key", "x-auth-token"];

/// Whether a header carries credentials.
pub fn is_sensitive_header(name: &str) -> bool {
    SENSITIVE_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name))
}

/// Header value as shown to the model.
pub fn censor_header_value<'a>(name: &str, value: &'a str) -> &'a str {
    if is_sensitive_header(name) {
        "***"
    } else {
        value
    }
}

/// Description of the `http_request` tool for a given engine configuration.
pub fn build_description(config: &EngineConfig) -> String {
    let mut description = String::from(BASE_DESCRIPTION);

    if let Some(base) = config.base_url() {
        description.push_str(&format!(
            " Base URL: {base} — use relative paths like /api/endpoint."
        ));
    }

    if !config.default_headers.is_empty() {
        let headers: Vec<String> = config
            .default_headers
            .iter()
            .map(|(name, value)| format!("{name}: {}", censor_header_value(name, value)))
            .collect();
        description.push_str(&format!(" Default headers: {}", headers.join(", ")));
    }

    description
}

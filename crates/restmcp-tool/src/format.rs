//! Plain-text rendering of responses.

use std::fmt::Write;

use restmcp_http::Response;

/// Headers left out of rendered output, in canonical form.
const NOISE_HEADERS: [&str; 14] = [
    "Date",
    "Server",
    "Connection",
    "Keep-Alive",
    "Transfer-Encoding",
    "Accept-Ranges",
    "Vary",
    "Etag",
    "Cache-Control",
    "Pragma",
    "Expires",
    "Age",
    "Via",
    "X-Cache",
];

/// Canonical header spelling: each dash-separated word capitalized.
pub fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn is_noise(canonical: &str) -> bool {
    NOISE_HEADERS.contains(&canonical)
}

/// Render a response as the tool's text output.
pub fn format_response(response: &Response, include_headers: bool) -> String {
    let mut out = format!("{} {}", response.status, response.status_text)
        .trim_end()
        .to_string();

    if include_headers {
        let mut lines: Vec<(String, String)> = Vec::new();
        for name in response.headers.keys() {
            let canonical = canonical_header_name(name.as_str());
            if is_noise(&canonical) {
                continue;
            }
            for value in response.headers.get_all(name) {
                lines.push((canonical.clone(), String::from_utf8_lossy(value.as_bytes()).into_owned()));
            }
        }
        lines.sort_by(|a, b| a.0.cmp(&b.0));
        for (name, value) in lines {
            let _ = write!(out, "\n{name}: {value}");
        }
    }

    if !response.body.is_empty() {
        out.push_str("\n\n");
        out.push_str(&response.text());
    }

    if response.truncated {
        let shown = response.body.len();
        if response.original_size > 0 {
            let _ = write!(out, "\n[truncated: {shown}/{} bytes]", response.original_size);
        } else {
            let _ = write!(out, "\n[truncated: {shown} bytes shown]");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use restmcp_http::reqwest::header::{HeaderMap, HeaderName, HeaderValue};

    fn with_headers(mut response: Response, headers: &[(&str, &str)]) -> Response {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.append(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        response.headers = map;
        response
    }

    #[test]
    fn test_canonical_header_name() {
        assert_eq!(canonical_header_name("content-type"), "Content-Type");
        assert_eq!(canonical_header_name("x-request-id"), "X-Request-Id");
        assert_eq!(canonical_header_name("etag"), "Etag");
    }

    #[test]
    fn test_status_and_body() {
        let out = format_response(&Response::from_status(200, "{\"ok\":true}"), false);
        assert_eq!(out, "200 OK\n\n{\"ok\":true}");
    }

    #[test]
    fn test_empty_body() {
        let out = format_response(&Response::from_status(204, ""), false);
        assert_eq!(out, "204 No Content");
    }

    #[test]
    fn test_unknown_status_has_no_trailing_space() {
        let out = format_response(&Response::from_status(599, ""), false);
        assert_eq!(out, "599");
    }

    #[test]
    fn test_headers_filtered_and_sorted() {
        let response = with_headers(
            Response::from_status(200, "hi"),
            &[
                ("x-request-id", "abc"),
                ("date", "Mon, 01 Jan 2024 00:00:00 GMT"),
                ("content-type", "text/plain"),
                ("etag", "\"v1\""),
                ("set-cookie", "a=1"),
                ("set-cookie", "b=2"),
            ],
        );

        let out = format_response(&response, true);
        assert_eq!(
            out,
            "200 OK\nContent-Type: text/plain\nSet-Cookie: a=1\nSet-Cookie: b=2\nX-Request-Id: abc\n\nhi"
        );
    }

    #[test]
    fn test_headers_hidden_by_default() {
        let response = with_headers(Response::from_status(200, "hi"), &[("content-type", "text/plain")]);
        assert!(!format_response(&response, false).contains("Content-Type"));
    }

    #[test]
    fn test_truncation_notice() {
        let mut response = Response::from_status(200, "x".repeat(100));
        response.truncated = true;
        response.original_size = 200;
        assert!(format_response(&response, false).ends_with("\n[truncated: 100/200 bytes]"));

        response.original_size = 0;
        assert!(format_response(&response, false).ends_with("\n[truncated: 100 bytes shown]"));
    }

    #[test]
    fn test_invalid_utf8_body_is_lossy() {
        let out = format_response(&Response::from_status(200, vec![0x66, 0xff, 0x6f]), false);
        assert_eq!(out, "200 OK\n\nf\u{fffd}o");
    }
}

//! Outgoing header resolution.

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Split raw `"Name: Value"` strings into a header map.
///
/// Only the first `": "` separates name from value, so values may contain
/// colons. Entries without a separator, or with an empty name, are skipped.
pub fn parse_headers<S: AsRef<str>>(raw: &[S]) -> BTreeMap<String, String> {
    raw.iter()
        .filter_map(|entry| {
            let entry = entry.as_ref();
            match entry.find(": ") {
                Some(idx) if idx > 0 => Some((entry[..idx].to_string(), entry[idx + 2..].to_string())),
                _ => None,
            }
        })
        .collect()
}

/// Reason a header could not be turned into a wire header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidHeader(pub String);

/// Merge default headers with per-call headers.
///
/// Per-call headers replace defaults with the same name. Names compare
/// case-insensitively, as they do on the wire.
pub fn resolve_headers(
    defaults: &BTreeMap<String, String>,
    overrides: &BTreeMap<String, String>,
) -> Result<HeaderMap, InvalidHeader> {
    let mut headers = HeaderMap::with_capacity(defaults.len() + overrides.len());
    for (name, value) in defaults.iter().chain(overrides.iter()) {
        let name = HeaderName::try_from(name.as_str())
            .map_err(|e| InvalidHeader(format!("invalid header name {name:?}: {e}")))?;
        let value = HeaderValue::try_from(value.as_str())
            .map_err(|e| InvalidHeader(format!("invalid value for header {name}: {e}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_simple_header() {
        let headers = parse_headers(&["Content-Type: application/json"]);
        assert_eq!(headers.get("Content-Type").map(String::as_str), Some("application/json"));
    }

    #[test]
    fn test_parse_value_with_colons() {
        let headers = parse_headers(&["Authorization: Bearer token:with:colons"]);
        assert_eq!(
            headers.get("Authorization").map(String::as_str),
            Some("Bearer token:with:colons")
        );
    }

    #[test]
    fn test_parse_skips_malformed() {
        let headers = parse_headers(&["NoSeparator", ": empty-name", "Key:no-space", "Ok: yes"]);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("Ok").map(String::as_str), Some("yes"));
    }

    #[test]
    fn test_override_wins() {
        let defaults = map(&[("X-Default", "default-value"), ("X-Custom", "will-be-overridden")]);
        let overrides = map(&[("X-Custom", "override-value")]);
        let headers = resolve_headers(&defaults, &overrides).unwrap();

        assert_eq!(headers.len(), 2);
        assert_eq!(headers["x-default"], "default-value");
        assert_eq!(headers["x-custom"], "override-value");
    }

    #[test]
    fn test_override_is_case_insensitive() {
        let defaults = map(&[("Accept", "text/plain")]);
        let overrides = map(&[("accept", "application/json")]);
        let headers = resolve_headers(&defaults, &overrides).unwrap();

        assert_eq!(headers.get_all("accept").iter().count(), 1);
        assert_eq!(headers["Accept"], "application/json");
    }

    #[test]
    fn test_invalid_header_name() {
        let err = resolve_headers(&map(&[("Bad Name", "x")]), &BTreeMap::new()).unwrap_err();
        assert!(err.0.contains("invalid header name"));
    }

    #[test]
    fn test_invalid_header_value() {
        let err = resolve_headers(&BTreeMap::new(), &map(&[("X-Bad", "line\nbreak")])).unwrap_err();
        assert!(err.0.contains("x-bad"));
    }

    proptest! {
        #[test]
        fn prop_per_call_wins_and_defaults_survive(
            defaults in proptest::collection::btree_map("x-[a-z]{1,8}", "[a-z0-9]{1,8}", 0..8),
            overrides in proptest::collection::btree_map("x-[a-z]{1,8}", "[A-Z0-9]{1,8}", 0..8),
        ) {
            let headers = resolve_headers(&defaults, &overrides).unwrap();
            for (name, value) in &overrides {
                prop_assert_eq!(headers[name.as_str()].to_str().unwrap(), value.as_str());
            }
            for (name, value) in defaults.iter().filter(|(n, _)| !overrides.contains_key(*n)) {
                prop_assert_eq!(headers[name.as_str()].to_str().unwrap(), value.as_str());
            }
        }
    }
}

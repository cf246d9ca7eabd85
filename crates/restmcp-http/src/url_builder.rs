//! Request URL resolution.

use std::collections::BTreeMap;

use url::Url;

use crate::error::HttpError;

/// Join a relative path onto the base URL.
///
/// Only URLs starting with `/` are joined, and only when a base is
/// configured; anything else is returned verbatim.
pub fn resolve_url(base_url: Option<&str>, url: &str) -> String {
    match base_url {
        Some(base) if !base.is_empty() && url.starts_with('/') => {
            format!("{}{}", base.trim_end_matches('/'), url)
        }
        _ => url.to_string(),
    }
}

/// Resolve the final request URL, setting query parameters.
///
/// Each parameter replaces any same-named parameter already present in the
/// URL. When parameters are applied the whole query string is re-encoded
/// with keys in sorted order.
pub fn build_url(
    base_url: Option<&str>,
    url: &str,
    query: &BTreeMap<String, String>,
) -> Result<Url, HttpError> {
    let resolved = resolve_url(base_url, url);
    let mut parsed = Url::parse(&resolved).map_err(|source| HttpError::UrlParse {
        url: resolved.clone(),
        source,
    })?;

    if !query.is_empty() {
        let mut merged: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in parsed.query_pairs() {
            merged
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
        for (key, value) in query {
            merged.insert(key.clone(), vec![value.clone()]);
        }

        parsed.query_pairs_mut().clear().extend_pairs(
            merged
                .iter()
                .flat_map(|(key, values)| values.iter().map(move |value| (key, value))),
        );
    }

    Ok(parsed)
}

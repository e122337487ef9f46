//! Shared HTTP utilities for the token exchange and issue gateway.

/// Media type GitHub recommends for REST requests.
pub(crate) const GITHUB_JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

pub(crate) fn extract_github_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}

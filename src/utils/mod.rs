//! Utility functions and helpers.

pub mod http;

use serde_json::Value;
use url::Url;

/// Placeholder shown for fields the listing leaves empty.
pub const NOT_AVAILABLE: &str = "N/A";

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Clean a scraped field into a single-line display string.
///
/// Line breaks become spaces and whitespace runs collapse. Missing or blank
/// input yields [`NOT_AVAILABLE`].
pub fn clean_text<S: AsRef<str>>(text: Option<S>) -> String {
    let cleaned = text
        .map(|t| t.as_ref().split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();

    if cleaned.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        cleaned
    }
}

/// Render a JSON value as text, treating falsy values as absent.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        other => Some(other.to_string()),
    }
}

//! Tender data structures.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier assigned to a tender by the listing site.
///
/// The site emits either integers or strings; the original JSON shape is kept
/// so the persisted seen-set round-trips unchanged.
///
/// `Unsigned` only holds integers above `i64::MAX`, so the derived ordering
/// stays numeric across both integer variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TenderId {
    Number(i64),
    Unsigned(u64),
    Text(String),
}

impl TenderId {
    /// Read an identifier from a payload value. Falsy values are not ids.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(0), _) => None,
                (Some(i), _) => Some(Self::Number(i)),
                (None, Some(u)) => Some(Self::Unsigned(u)),
                _ => None,
            },
            Value::String(s) if !s.is_empty() => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for TenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Unsigned(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TenderId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for TenderId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// An open tender parsed from a listing page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tender {
    pub id: TenderId,

    /// Tender title
    pub title: String,

    /// Purchasing organization
    pub purchaser: String,

    /// Bid closing date as displayed by the site
    pub closing_date: String,

    /// Region name
    pub location: String,

    /// Absolute URL of the tender detail page
    pub detail_url: String,
}

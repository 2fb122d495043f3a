// src/services/parser.rs

//! Tender listing parser.
//!
//! Listing pages embed their data as JSON in the `data-page` attribute of the
//! `#app` root element:
//!
//! ```text
//! {props: {tenders: {data: [{id, title, is_open, bid_closing_date_text,
//!                            company: {name_en}, region: {name_en}}, ...]}}}
//! ```

use scraper::{Html, Selector};
use serde_json::Value;
use url::Url;

use crate::models::{Tender, TenderId};
use crate::utils::{clean_text, resolve_url, value_text};

const ROOT_SELECTOR: &str = "#app";
const PAYLOAD_ATTR: &str = "data-page";
const ITEMS_POINTER: &str = "/props/tenders/data";

/// Pull the embedded JSON payload out of a listing page.
pub fn extract_payload(document: &Html) -> Option<String> {
    let selector = Selector::parse(ROOT_SELECTOR).ok()?;
    let root = document.select(&selector).next()?;
    root.value()
        .attr(PAYLOAD_ATTR)
        .filter(|payload| !payload.trim().is_empty())
        .map(str::to_string)
}

/// Parse open tenders from a page payload, in page order.
///
/// A malformed payload is logged and treated as an empty page.
pub fn parse_tenders(payload: &str, base_url: &Url) -> Vec<Tender> {
    let data: Value = match serde_json::from_str(payload) {
        Ok(data) => data,
        Err(e) => {
            log::warn!("Error parsing tender data: {}", e);
            return Vec::new();
        }
    };

    let Some(items) = data.pointer(ITEMS_POINTER).and_then(Value::as_array) else {
        log::debug!("Payload has no {} array", ITEMS_POINTER);
        return Vec::new();
    };

    items
        .iter()
        .filter(|item| item.get("is_open") == Some(&Value::Bool(true)))
        .filter_map(|item| parse_item(item, base_url))
        .collect()
}

fn parse_item(item: &Value, base_url: &Url) -> Option<Tender> {
    let id = item.get("id").and_then(TenderId::from_value)?;
    let field = |pointer: &str| item.pointer(pointer).and_then(value_text);

    Some(Tender {
        title: clean_text(field("/title")),
        purchaser: clean_text(field("/company/name_en")),
        closing_date: clean_text(field("/bid_closing_date_text")),
        location: clean_text(field("/region/name_en")),
        detail_url: resolve_url(base_url, &format!("/tenders/{id}")),
        id,
    })
}

//! Service layer for the tender watcher.
//!
//! This module contains the collaborators of the discovery loop:
//! - Listing page fetching (`PageSource`, `HttpPageSource`)
//! - Payload parsing (`parse_tenders`)
//! - Notification delivery (`Notifier`, `TelegramNotifier`)

pub mod fetcher;
pub mod notifier;
pub mod parser;

pub use fetcher::{HttpPageSource, PageFetch, PageSource};
pub use notifier::{Notifier, TelegramNotifier, render_message};
pub use parser::{extract_payload, parse_tenders};

// src/models/mod.rs

//! Domain models for the tender watcher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod recipient;
mod seen;
mod tender;

// Re-export all public types
pub use config::{Config, PathsConfig, ScrapeConfig, SiteConfig, TelegramConfig};
pub use recipient::{Recipient, RecipientList};
pub use seen::{RunMode, SeenSet};
pub use tender::{Tender, TenderId};

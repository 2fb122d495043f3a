//! Pipeline entry points for tender checks.
//!
//! - `Discovery`: walk listing pages and notify about unseen tenders
//! - `run_check`: load the seen-set, run discovery, persist and report

pub mod check;
pub mod discover;

pub use check::{RunSummary, run_check};
pub use discover::{Discovery, DiscoveryOutcome, StopReason};

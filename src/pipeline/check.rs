// src/pipeline/check.rs

//! Tender check pipeline: load state, discover, persist, report.

use chrono::{DateTime, Local, Utc};

use crate::error::Result;
use crate::models::{Config, RecipientList, RunMode};
use crate::services::{Notifier, PageSource};
use crate::storage::SeenStorage;

use super::discover::{Discovery, DiscoveryOutcome};

/// Summary of a completed check.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub mode: RunMode,
    pub outcome: DiscoveryOutcome,
    /// Whether the seen-set was rewritten
    pub persisted: bool,
}

/// Run one tender check.
pub async fn run_check(
    config: &Config,
    storage: &dyn SeenStorage,
    source: &dyn PageSource,
    notifier: &dyn Notifier,
    recipients: &RecipientList,
) -> Result<RunSummary> {
    let start_time = Utc::now();
    log::info!(
        "--- [{}] Running tender check for {} chats... ---",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        recipients.len()
    );

    let (mut seen, mode) = storage.load().await;
    match mode {
        RunMode::Priming => {
            log::info!("First run detected. Will perform a deep scrape to build a baseline.")
        }
        RunMode::Steady => log::info!(
            "Loaded {} previously known tender IDs. Starting efficient check.",
            seen.len()
        ),
    }

    let outcome = Discovery::new(config, source, notifier, recipients)
        .run(&mut seen, mode)
        .await?;

    let persisted = outcome.new_tenders > 0;
    if persisted {
        storage.save(&seen).await?;
    } else {
        log::info!("No new tenders found in this run.");
    }

    match mode {
        RunMode::Priming => log::info!(
            "Initial setup complete. Sent {} and primed a total of {} tenders.",
            outcome.initial_sent,
            outcome.new_tenders
        ),
        RunMode::Steady => log::info!(
            "Finished efficient run. Found and sent {} new tender(s).",
            outcome.new_tenders
        ),
    }
    if outcome.delivery_failures > 0 {
        log::warn!(
            "{} of {} deliveries failed.",
            outcome.delivery_failures,
            outcome.deliveries
        );
    }
    log::debug!(
        "Stopped after {} page(s): {:?}",
        outcome.pages_fetched,
        outcome.stop_reason
    );

    Ok(RunSummary {
        start_time,
        end_time: Utc::now(),
        mode,
        outcome,
        persisted,
    })
}

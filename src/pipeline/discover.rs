// src/pipeline/discover.rs

//! Incremental tender discovery.
//!
//! Walks listing pages newest-first, notifying recipients about tenders whose
//! ids are not in the seen-set. In steady mode the walk stops at the first page
//! that contains an already known tender.

use std::time::Duration;

use crate::error::Result;
use crate::models::{Config, RecipientList, RunMode, SeenSet, Tender};
use crate::services::{Notifier, PageFetch, PageSource, parse_tenders};

/// Why the page walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every page up to `max_pages` was processed
    PageLimit,
    /// A page did not load within the timeout
    TimedOut,
    /// A page had no embedded payload
    MissingPayload,
    /// A page listed no open tenders
    EmptyPage,
    /// A page could not be fetched
    FetchFailed,
    /// A page contained previously seen tenders
    ReachedKnown,
}

/// Counters for a discovery pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOutcome {
    pub pages_fetched: u32,
    pub new_tenders: usize,
    pub initial_sent: usize,
    pub deliveries: usize,
    pub delivery_failures: usize,
    pub stop_reason: StopReason,
}

/// Drives one discovery pass over the listing.
pub struct Discovery<'a> {
    config: &'a Config,
    source: &'a dyn PageSource,
    notifier: &'a dyn Notifier,
    recipients: &'a RecipientList,
}

impl<'a> Discovery<'a> {
    pub fn new(
        config: &'a Config,
        source: &'a dyn PageSource,
        notifier: &'a dyn Notifier,
        recipients: &'a RecipientList,
    ) -> Self {
        Self {
            config,
            source,
            notifier,
            recipients,
        }
    }

    /// Walk the listing, recording new ids in `seen`.
    pub async fn run(&self, seen: &mut SeenSet, mode: RunMode) -> Result<DiscoveryOutcome> {
        let scrape = &self.config.scrape;
        let base_url = self.config.site.base()?;
        let delay = Duration::from_millis(scrape.politeness_delay_ms);

        let mut outcome = DiscoveryOutcome {
            pages_fetched: 0,
            new_tenders: 0,
            initial_sent: 0,
            deliveries: 0,
            delivery_failures: 0,
            stop_reason: StopReason::PageLimit,
        };

        for page in 1..=scrape.max_pages {
            let payload = match self.source.fetch(page).await {
                Ok(PageFetch::Payload(payload)) => payload,
                Ok(PageFetch::Missing) => {
                    log::info!("Page {} has no tender data. Stopping.", page);
                    outcome.stop_reason = StopReason::MissingPayload;
                    break;
                }
                Ok(PageFetch::TimedOut) => {
                    log::warn!("Page {} did not load correctly.", page);
                    outcome.stop_reason = StopReason::TimedOut;
                    break;
                }
                Err(e) => {
                    log::warn!("Page {} could not be fetched: {}", page, e);
                    outcome.stop_reason = StopReason::FetchFailed;
                    break;
                }
            };
            outcome.pages_fetched += 1;

            let tenders = parse_tenders(&payload, &base_url);
            if tenders.is_empty() {
                log::info!("No tenders found on page {}. Stopping.", page);
                outcome.stop_reason = StopReason::EmptyPage;
                break;
            }

            let mut new_on_page = 0;
            for tender in &tenders {
                if !seen.insert(tender.id.clone()) {
                    continue;
                }
                new_on_page += 1;
                outcome.new_tenders += 1;

                match mode {
                    RunMode::Priming if outcome.initial_sent < scrape.max_initial_send => {
                        log::info!("INITIAL SEND: '{}'", tender.title);
                        self.notify_all(tender, true, &mut outcome).await;
                        outcome.initial_sent += 1;
                    }
                    RunMode::Priming => {
                        log::info!("PRIMING: Found tender '{}'", tender.title);
                    }
                    RunMode::Steady => {
                        log::info!("NEW TENDER: '{}'", tender.title);
                        self.notify_all(tender, false, &mut outcome).await;
                    }
                }
            }

            // Listings are newest-first, so a known tender marks the boundary.
            if mode == RunMode::Steady && new_on_page < tenders.len() {
                log::info!(
                    "Stopping scrape because page {} contained previously seen tenders.",
                    page
                );
                outcome.stop_reason = StopReason::ReachedKnown;
                break;
            }

            if page < scrape.max_pages && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        Ok(outcome)
    }

    /// Send one tender to every recipient; failures are logged and counted.
    async fn notify_all(&self, tender: &Tender, initial: bool, outcome: &mut DiscoveryOutcome) {
        for recipient in self.recipients.iter() {
            outcome.deliveries += 1;
            if let Err(e) = self.notifier.notify(recipient, tender, initial).await {
                outcome.delivery_failures += 1;
                log::error!("Error sending to chat ID {}: {}", recipient, e);
            }
        }
    }
}

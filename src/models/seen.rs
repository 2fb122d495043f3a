//! Seen-set of already processed tender ids.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::TenderId;

/// Whether this run establishes a baseline or watches for changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// No usable seen-set: notify a capped number of tenders and record the rest
    Priming,
    /// Known baseline: notify every new tender
    Steady,
}

impl RunMode {
    pub fn is_priming(self) -> bool {
        matches!(self, Self::Priming)
    }
}

/// Tender ids notified in this or an earlier run.
///
/// Ids are only ever added. Serializes as a sorted JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenSet {
    ids: BTreeSet<TenderId>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &TenderId) -> bool {
        self.ids.contains(id)
    }

    /// Record an id. Returns `true` if it was not seen before.
    pub fn insert(&mut self, id: TenderId) -> bool {
        self.ids.insert(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TenderId> {
        self.ids.iter()
    }
}

impl FromIterator<TenderId> for SeenSet {
    fn from_iter<I: IntoIterator<Item = TenderId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

//! Storage abstractions for seen-set persistence.
//!
//! The seen-set is a flat JSON array of tender ids:
//!
//! ```text
//! data/
//! ├── config.toml
//! ├── chat_ids.json       # Recipients
//! └── sent_tenders.json   # Seen-set, rewritten in full when it grows
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{RunMode, SeenSet};

// Re-export for convenience
pub use local::LocalSeenStore;

/// Trait for seen-set storage backends.
#[async_trait]
pub trait SeenStorage: Send + Sync {
    /// Load the persisted seen-set.
    ///
    /// A missing or unreadable set starts a [`RunMode::Priming`] run with an
    /// empty set; never fails.
    async fn load(&self) -> (SeenSet, RunMode);

    /// Overwrite the persisted seen-set with `seen`.
    async fn save(&self, seen: &SeenSet) -> Result<()>;
}

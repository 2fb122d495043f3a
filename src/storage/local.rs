//! Local filesystem storage implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{RunMode, SeenSet, TenderId};
use crate::storage::SeenStorage;

/// Seen-set stored as a JSON file.
#[derive(Debug, Clone)]
pub struct LocalSeenStore {
    path: PathBuf,
}

impl LocalSeenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl SeenStorage for LocalSeenStore {
    async fn load(&self) -> (SeenSet, RunMode) {
        let bytes = match self.read_bytes().await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                log::info!("No seen-set at {}", self.path.display());
                return (SeenSet::new(), RunMode::Priming);
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", self.path.display(), e);
                return (SeenSet::new(), RunMode::Priming);
            }
        };

        let entries = match serde_json::from_slice::<Vec<Value>>(&bytes) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Ignoring corrupt seen-set {}: {}", self.path.display(), e);
                return (SeenSet::new(), RunMode::Priming);
            }
        };

        // Unusable entries are dropped; the rest of the baseline is kept.
        let total = entries.len();
        let seen: SeenSet = entries.iter().filter_map(TenderId::from_value).collect();
        let skipped = total - seen.len();
        if skipped > 0 {
            log::warn!(
                "Skipped {} unusable or duplicate entries in {}",
                skipped,
                self.path.display()
            );
        }
        (seen, RunMode::Steady)
    }

    async fn save(&self, seen: &SeenSet) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(seen)?;
        self.write_bytes(&bytes).await?;
        log::info!(
            "Saved {} tender IDs to {}",
            seen.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_first_run() {
        let tmp = TempDir::new().unwrap();
        let store = LocalSeenStore::new(tmp.path().join("sent_tenders.json"));

        let (seen, mode) = store.load().await;
        assert!(seen.is_empty());
        assert_eq!(mode, RunMode::Priming);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_first_run() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sent_tenders.json");
        std::fs::write(&path, "{\"oops\": true").unwrap();

        let (seen, mode) = LocalSeenStore::new(&path).load().await;
        assert!(seen.is_empty());
        assert_eq!(mode, RunMode::Priming);
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let store = LocalSeenStore::new(tmp.path().join("state/sent_tenders.json"));

        let seen: SeenSet = [TenderId::Number(3), TenderId::from("a")]
            .into_iter()
            .collect();
        store.save(&seen).await.unwrap();

        let (loaded, mode) = store.load().await;
        assert_eq!(loaded, seen);
        assert_eq!(mode, RunMode::Steady);
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_empty_list_is_steady() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sent_tenders.json");
        std::fs::write(&path, "[]").unwrap();

        let (seen, mode) = LocalSeenStore::new(&path).load().await;
        assert!(seen.is_empty());
        assert_eq!(mode, RunMode::Steady);
    }

    #[tokio::test]
    async fn test_wide_and_odd_ids_keep_baseline() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sent_tenders.json");
        std::fs::write(&path, r#"[1, 2, 18446744073709551615, 1.5, "t-3"]"#).unwrap();

        let (seen, mode) = LocalSeenStore::new(&path).load().await;
        assert_eq!(mode, RunMode::Steady);
        assert_eq!(seen.len(), 4);
        assert!(seen.contains(&TenderId::Unsigned(u64::MAX)));
        assert!(seen.contains(&TenderId::Text("t-3".into())));
    }
}

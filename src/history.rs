//! Persistent post history store.
//!
//! The history is an append-only log of every accepted article, serialized
//! wholesale as a JSON array. One store instance owns one file for the
//! duration of a run; there is no concurrent-writer protection and no
//! partial-write protection — a crash mid-save can corrupt the file, and a
//! corrupt file is treated as empty on the next load.
//!
//! `load` fails soft so a fresh deployment (no history file yet) still
//! works; `save` failures are fatal to the caller because losing the write
//! would undermine future duplicate detection.

use crate::models::HistoryEntry;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Error persisting the history log. Treated as fatal for the run.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to write history file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File-backed store for the post history log.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full history log into memory.
    ///
    /// A missing file is a normal fresh-deployment state and yields an
    /// empty log. A malformed file also yields an empty log, with a
    /// warning, since the run must still be able to publish; this silently
    /// discards prior novelty-tracking state.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub async fn load(&self) -> Vec<HistoryEntry> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No history file yet; starting with an empty log");
                return Vec::new();
            }
            Err(e) => {
                warn!(error = %e, "Could not read history file; treating log as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(entries) => {
                info!(count = entries.len(), "Loaded post history");
                entries
            }
            Err(e) => {
                warn!(error = %e, "History file is malformed; treating log as empty");
                Vec::new()
            }
        }
    }

    /// Persist the full log, overwriting any prior content.
    ///
    /// The parent directory is created if missing. There is no atomic
    /// rename; callers accept the documented corruption risk of a crash
    /// mid-write.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display(), count = entries.len()))]
    pub async fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json).await?;
        info!("Saved post history");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn entry(title: &str) -> HistoryEntry {
        HistoryEntry {
            title: title.to_string(),
            theme: "Some theme".to_string(),
            category: Category::Health,
            date: "2025-05-06".to_string(),
            preview: "preview text".to_string(),
            content_hash: "deadbeef".to_string(),
        }
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("post_history.json"));
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_malformed_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("post_history.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = HistoryStore::new(&path);
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("post_history.json"));

        let entries = vec![entry("First"), entry("Second")];
        store.save(&entries).await.unwrap();

        let loaded = store.load().await;
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].title, "First");
        assert_eq!(loaded[1].title, "Second");
    }

    #[tokio::test]
    async fn test_save_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("nested/dir/post_history.json"));
        store.save(&[entry("Only")]).await.unwrap();
        assert_eq!(store.load().await.len(), 1);
    }

    #[tokio::test]
    async fn test_save_overwrites_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("post_history.json"));

        store.save(&[entry("A"), entry("B"), entry("C")]).await.unwrap();
        store.save(&[entry("A")]).await.unwrap();

        assert_eq!(store.load().await.len(), 1);
    }
}

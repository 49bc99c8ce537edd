//! Durable progress log
//!
//! The whole log lives in memory and is mirrored to a single JSON array on
//! disk. Every append rewrites the file. Reads never fail: a missing or
//! unreadable file starts an empty log.

use fit_ai_shared::{ProgressEntry, StorageError};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct ProgressStore {
    path: PathBuf,
    entries: Vec<ProgressEntry>,
}

impl ProgressStore {
    /// Load the log from `path`, recovering silently from a missing or corrupt file
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Vec<ProgressEntry>>(&bytes) {
                Ok(entries) => {
                    info!(path = %path.display(), count = entries.len(), "Progress log loaded");
                    entries
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Progress file is corrupt, starting empty");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No progress file yet");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Progress file unreadable, starting empty");
                Vec::new()
            }
        };

        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[ProgressEntry] {
        &self.entries
    }

    /// Append in memory, then rewrite the file
    ///
    /// A flush error is returned to the caller but the in-memory entry stays.
    pub async fn append_progress(&mut self, entry: ProgressEntry) -> Result<(), StorageError> {
        self.entries.push(entry);
        self.flush().await
    }

    async fn flush(&self) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(&self.entries)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }

        // Write then rename so a crash mid-write leaves the previous log intact
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), count = self.entries.len(), "Progress log flushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fit_ai_shared::{Intensity, Mood};
    use tempfile::TempDir;

    fn entry(day: u32, weight: f64) -> ProgressEntry {
        ProgressEntry::recorded_on(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            weight,
            Mood::Medium,
            Intensity::Moderate,
            None,
        )
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_log() {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::load(dir.path().join("progress.json")).await;
        assert!(store.entries().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_empty_log() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = ProgressStore::load(&path).await;
        assert!(store.entries().is_empty());
    }

    #[tokio::test]
    async fn test_append_then_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.json");

        let mut store = ProgressStore::load(&path).await;
        let first = ProgressEntry::recorded_on(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            80.0,
            Mood::High,
            Intensity::Intense,
            None,
        );
        store.append_progress(first.clone()).await.unwrap();

        let reloaded = ProgressStore::load(&path).await;
        assert_eq!(reloaded.entries(), &[first]);
    }

    #[tokio::test]
    async fn test_order_preserved_across_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("progress.json");

        let mut store = ProgressStore::load(&path).await;
        let entries = vec![entry(1, 80.0), entry(2, 79.0), entry(3, 78.5)];
        for e in &entries {
            store.append_progress(e.clone()).await.unwrap();
        }

        assert_eq!(store.entries(), entries.as_slice());
        assert_eq!(ProgressStore::load(&path).await.entries(), entries.as_slice());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_failed_flush_keeps_entry_in_memory() {
        let dir = TempDir::new().unwrap();
        // A regular file where the parent directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        let mut store = ProgressStore::load(blocker.join("progress.json")).await;
        let result = store.append_progress(entry(1, 80.0)).await;

        assert!(matches!(result, Err(StorageError::Io(_))));
        assert_eq!(store.entries().len(), 1);
    }
}

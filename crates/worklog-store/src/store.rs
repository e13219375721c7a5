//! Ordered, file-backed collection of work-log entries

use crate::io::{read_json, write_json};
use crate::{EntryFilter, LogEntry, StoreError};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// The work log: entries in insertion order, persisted wholesale to one JSON file.
///
/// Every mutation holds the lock across the change and the write that follows,
/// so concurrent edits cannot interleave and the file always holds a snapshot
/// the in-memory list actually passed through.
pub struct LogStore {
    path: PathBuf,
    entries: Mutex<Vec<LogEntry>>,
}

impl LogStore {
    /// Load the store at `path`. A missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let load_path = path.clone();
        let entries = tokio::task::spawn_blocking(move || read_json::<Vec<LogEntry>>(&load_path))
            .await??
            .unwrap_or_default();

        info!(path = %path.display(), entries = entries.len(), "loaded work log");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// In-memory store that has not been loaded from disk
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of all entries in insertion order
    pub async fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub async fn get(&self, id: &str) -> Option<LogEntry> {
        self.entries
            .lock()
            .await
            .iter()
            .find(|e| e.id() == id)
            .cloned()
    }

    /// Entries matching `filter`, in insertion order
    pub async fn filter(&self, filter: &EntryFilter) -> Vec<LogEntry> {
        self.entries
            .lock()
            .await
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect()
    }

    /// Append a new entry and persist
    pub async fn append(&self, entry: LogEntry) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        if entries.iter().any(|e| e.id() == entry.id()) {
            return Err(StoreError::DuplicateId(entry.id().to_string()));
        }
        entries.push(entry);
        self.persist(&entries).await
    }

    /// Replace the entry with the same id and persist
    pub async fn update(&self, entry: LogEntry) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        let slot = entries
            .iter_mut()
            .find(|e| e.id() == entry.id())
            .ok_or_else(|| StoreError::NotFound(entry.id().to_string()))?;
        *slot = entry;
        self.persist(&entries).await
    }

    /// Edit an entry in place and persist; returns the edited entry
    pub async fn modify<F>(&self, id: &str, edit: F) -> Result<LogEntry, StoreError>
    where
        F: FnOnce(&mut LogEntry),
    {
        let mut entries = self.entries.lock().await;
        let slot = entries
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        edit(slot);
        let edited = slot.clone();
        self.persist(&entries).await?;
        Ok(edited)
    }

    /// Remove by id and persist
    pub async fn remove(&self, id: &str) -> Result<LogEntry, StoreError> {
        let mut entries = self.entries.lock().await;
        let index = entries
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let removed = entries.remove(index);
        self.persist(&entries).await?;
        Ok(removed)
    }

    /// Remove by position and persist
    pub async fn remove_at(&self, index: usize) -> Result<LogEntry, StoreError> {
        let mut entries = self.entries.lock().await;
        if index >= entries.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: entries.len(),
            });
        }
        let removed = entries.remove(index);
        self.persist(&entries).await?;
        Ok(removed)
    }

    /// Persist the current state (e.g. on shutdown)
    pub async fn save(&self) -> Result<(), StoreError> {
        let entries = self.entries.lock().await;
        self.persist(&entries).await
    }

    // Called with the lock held. The in-memory change stays applied even if the write fails.
    async fn persist(&self, entries: &[LogEntry]) -> Result<(), StoreError> {
        let snapshot = entries.to_vec();
        let path = self.path.clone();
        let result = tokio::task::spawn_blocking(move || write_json(&path, &snapshot))
            .await
            .map_err(StoreError::from)
            .and_then(|r| r);

        match &result {
            Ok(()) => debug!(path = %self.path.display(), entries = entries.len(), "saved work log"),
            Err(e) => error!(path = %self.path.display(), error = %e, "failed to save work log"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;
    use chrono::DateTime;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn entry(day: &str, content: &str, category: Category) -> LogEntry {
        let date = DateTime::parse_from_rfc3339(&format!("{}T09:00:00+00:00", day)).unwrap();
        LogEntry::with_date(date, content, category)
    }

    #[tokio::test]
    async fn test_open_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = LogStore::open(temp.path().join("entries.json")).await.unwrap();
        assert!(store.is_empty().await);
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_roundtrip_preserves_content_and_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("entries.json");

        let originals = vec![
            entry("2025-02-11", "reviewed PR", Category::Daily),
            entry("2025-02-10", "fixed bug A", Category::Daily),
            entry("2025-02-14", "# Weekly\n- shipped", Category::Weekly),
            entry("2025-02-12", "with image", Category::Daily).with_images(vec![vec![1, 2, 3]]),
        ];

        let store = LogStore::open(&path).await.unwrap();
        for e in &originals {
            store.append(e.clone()).await.unwrap();
        }

        let reloaded = LogStore::open(&path).await.unwrap();
        assert_eq!(reloaded.entries().await, originals);
    }

    #[tokio::test]
    async fn test_update_and_modify_replace_by_id() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("entries.json");
        let store = LogStore::open(&path).await.unwrap();

        let mut first = entry("2025-02-10", "draft", Category::Daily);
        let id = first.id().to_string();
        store.append(first.clone()).await.unwrap();
        store
            .append(entry("2025-02-11", "other", Category::Daily))
            .await
            .unwrap();

        first.content = "final".to_string();
        store.update(first).await.unwrap();

        let edited = store
            .modify(&id, |e| e.category = Category::Weekly)
            .await
            .unwrap();
        assert_eq!(edited.content, "final");
        assert_eq!(edited.category, Category::Weekly);

        let reloaded = LogStore::open(&path).await.unwrap();
        let entries = reloaded.entries().await;
        assert_eq!(entries[0].id(), id);
        assert_eq!(entries[0].content, "final");
        assert_eq!(entries[1].content, "other");
    }

    #[tokio::test]
    async fn test_update_unknown_id_fails() {
        let temp = TempDir::new().unwrap();
        let store = LogStore::open(temp.path().join("entries.json")).await.unwrap();
        let result = store.update(entry("2025-02-10", "x", Category::Daily)).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_append_duplicate_id_rejected() {
        let temp = TempDir::new().unwrap();
        let store = LogStore::open(temp.path().join("entries.json")).await.unwrap();
        let e = entry("2025-02-10", "x", Category::Daily);
        store.append(e.clone()).await.unwrap();
        assert!(matches!(
            store.append(e).await,
            Err(StoreError::DuplicateId(_))
        ));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove_by_id_and_index() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("entries.json");
        let store = LogStore::open(&path).await.unwrap();

        let a = entry("2025-02-10", "a", Category::Daily);
        let b = entry("2025-02-11", "b", Category::Daily);
        let c = entry("2025-02-12", "c", Category::Daily);
        for e in [&a, &b, &c] {
            store.append(e.clone()).await.unwrap();
        }

        let removed = store.remove(b.id()).await.unwrap();
        assert_eq!(removed.content, "b");

        let removed = store.remove_at(0).await.unwrap();
        assert_eq!(removed.content, "a");

        assert!(matches!(
            store.remove_at(5).await,
            Err(StoreError::IndexOutOfRange { index: 5, len: 1 })
        ));

        let reloaded = LogStore::open(&path).await.unwrap();
        let contents: Vec<_> = reloaded
            .entries()
            .await
            .into_iter()
            .map(|e| e.content)
            .collect();
        assert_eq!(contents, vec!["c"]);
    }

    #[tokio::test]
    async fn test_filter_by_category() {
        let temp = TempDir::new().unwrap();
        let store = LogStore::open(temp.path().join("entries.json")).await.unwrap();
        store
            .append(entry("2025-02-10", "daily one", Category::Daily))
            .await
            .unwrap();
        store
            .append(entry("2025-02-14", "weekly one", Category::Weekly))
            .await
            .unwrap();

        let weekly = store.filter(&EntryFilter::category(Category::Weekly)).await;
        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].content, "weekly one");
    }

    #[tokio::test]
    async fn test_open_corrupt_file_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("entries.json");
        std::fs::write(&path, "not json at all").unwrap();

        let result = LogStore::open(&path).await;
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json at all");
    }

    #[tokio::test]
    async fn test_save_failure_is_reported_not_panicked() {
        let temp = TempDir::new().unwrap();
        // A directory where the file should be makes the rename fail.
        let path = temp.path().join("entries.json");
        std::fs::create_dir_all(path.join("blocker")).unwrap();

        let store = LogStore::empty(&path);
        let result = store
            .append(entry("2025-02-10", "kept in memory", Category::Daily))
            .await;
        assert!(matches!(result, Err(StoreError::Write { .. })));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_save_persists_changes_a_failed_write_left_in_memory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("entries.json");
        let store = LogStore::open(&path).await.unwrap();
        store
            .append(entry("2025-02-10", "first", Category::Daily))
            .await
            .unwrap();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir_all(path.join("blocker")).unwrap();
        let result = store
            .append(entry("2025-02-11", "second", Category::Daily))
            .await;
        assert!(result.is_err());

        std::fs::remove_dir_all(&path).unwrap();
        store.save().await.unwrap();

        let reloaded = LogStore::open(&path).await.unwrap();
        assert_eq!(reloaded.entries().await, store.entries().await);
        assert_eq!(reloaded.len().await, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_all_persist() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("entries.json");
        let store = Arc::new(LogStore::open(&path).await.unwrap());

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .append(entry("2025-02-10", &format!("entry {}", i), Category::Daily))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let reloaded = LogStore::open(&path).await.unwrap();
        assert_eq!(reloaded.len().await, 16);
        assert_eq!(reloaded.entries().await, store.entries().await);
    }
}

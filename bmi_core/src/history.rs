//! Bounded BMI history, newest first.
//!
//! The history is a JSON array of [`HistoryRecord`] under the `bmiHistory`
//! key. Only the ten most recent records are kept. Corrupt data is logged
//! and treated as an empty history; a failing store is not.

use crate::storage::{KeyValueStore, HISTORY_KEY};
use crate::{HistoryRecord, Result};

/// Number of records kept; older ones are evicted on append
pub const HISTORY_CAPACITY: usize = 10;

/// Sole reader and writer of the persisted history list
pub struct HistoryStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Load all records, newest first.
    ///
    /// Never fails: missing or corrupt data yields an empty list, and so
    /// does a store that cannot be read (logged).
    pub fn load_all(&self) -> Vec<HistoryRecord> {
        self.load().unwrap_or_else(|e| {
            tracing::warn!("Failed to read BMI history: {}. Treating as empty.", e);
            Vec::new()
        })
    }

    /// Read errors propagate; only unparseable contents count as empty
    fn load(&self) -> Result<Vec<HistoryRecord>> {
        let Some(contents) = self.store.get(HISTORY_KEY)? else {
            tracing::debug!("No BMI history stored yet");
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<HistoryRecord>>(&contents) {
            Ok(mut records) => {
                records.truncate(HISTORY_CAPACITY);
                tracing::debug!("Loaded {} history records", records.len());
                Ok(records)
            }
            Err(e) => {
                tracing::warn!("Corrupt BMI history: {}. Treating as empty.", e);
                Ok(Vec::new())
            }
        }
    }

    /// Insert a record at the front, evict beyond capacity, and persist.
    ///
    /// If the existing history cannot be read, nothing is written.
    pub fn append(&mut self, record: HistoryRecord) -> Result<()> {
        let mut records = self.load()?;
        records.insert(0, record);

        if records.len() > HISTORY_CAPACITY {
            let evicted = records.len() - HISTORY_CAPACITY;
            records.truncate(HISTORY_CAPACITY);
            tracing::debug!("Evicted {} oldest history record(s)", evicted);
        }

        let contents = serde_json::to_string(&records)?;
        self.store.set(HISTORY_KEY, &contents)?;

        tracing::info!("Saved BMI record ({} in history)", records.len());
        Ok(())
    }

    /// Remove the persisted history entirely
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(HISTORY_KEY)?;
        tracing::info!("Cleared BMI history");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};

    fn record(bmi: f64, timestamp_millis: i64) -> HistoryRecord {
        HistoryRecord {
            bmi,
            category: "Normal Weight".into(),
            iso_date: "2024-01-15".into(),
            timestamp_millis,
        }
    }

    #[test]
    fn test_empty_history() {
        let history = HistoryStore::new(MemoryStore::new());
        assert!(history.load_all().is_empty());
    }

    #[test]
    fn test_append_is_newest_first() {
        let mut history = HistoryStore::new(MemoryStore::new());
        history.append(record(20.0, 1)).unwrap();
        history.append(record(21.0, 2)).unwrap();

        let records = history.load_all();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp_millis, 2);
        assert_eq!(records[1].timestamp_millis, 1);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = HistoryStore::new(MemoryStore::new());
        for i in 0..11 {
            history.append(record(20.0 + i as f64, i)).unwrap();
        }

        let records = history.load_all();
        assert_eq!(records.len(), HISTORY_CAPACITY);
        assert_eq!(records[0].timestamp_millis, 10);
        assert_eq!(records[9].timestamp_millis, 1);
        assert!(records.iter().all(|r| r.timestamp_millis != 0));
    }

    #[test]
    fn test_corrupt_history_treated_as_empty() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, "{ invalid json }").unwrap();

        let mut history = HistoryStore::new(store);
        assert!(history.load_all().is_empty());

        // Appending replaces the corrupt value
        history.append(record(22.9, 5)).unwrap();
        assert_eq!(history.load_all().len(), 1);
    }

    /// Store whose reads fail while `broken` is set
    struct FlakyStore {
        inner: MemoryStore,
        broken: bool,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            if self.broken {
                let err = std::io::Error::new(std::io::ErrorKind::Other, "disk read failed");
                return Err(err.into());
            }
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_read_failure_does_not_overwrite_history() {
        let mut history = HistoryStore::new(FlakyStore {
            inner: MemoryStore::new(),
            broken: false,
        });
        for i in 0..5 {
            history.append(record(20.0, i)).unwrap();
        }

        history.store.broken = true;
        assert!(history.load_all().is_empty());
        assert!(matches!(
            history.append(record(22.9, 99)),
            Err(crate::Error::Io(_))
        ));

        history.store.broken = false;
        let records = history.load_all();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].timestamp_millis, 4);
    }

    #[test]
    fn test_oversized_history_truncated_on_load() {
        let records: Vec<_> = (0..15).map(|i| record(20.0, i)).collect();
        let mut store = MemoryStore::new();
        store
            .set(HISTORY_KEY, &serde_json::to_string(&records).unwrap())
            .unwrap();

        let history = HistoryStore::new(store);
        assert_eq!(history.load_all().len(), HISTORY_CAPACITY);
    }

    #[test]
    fn test_clear() {
        let mut history = HistoryStore::new(MemoryStore::new());
        history.append(record(22.9, 1)).unwrap();
        history.clear().unwrap();
        assert!(history.load_all().is_empty());
    }

    #[test]
    fn test_persists_across_instances() {
        let temp_dir = tempfile::tempdir().unwrap();

        let mut history = HistoryStore::new(FileStore::new(temp_dir.path()));
        history.append(record(22.9, 42)).unwrap();

        let reopened = HistoryStore::new(FileStore::new(temp_dir.path()));
        let records = reopened.load_all();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].timestamp_millis, 42);

        let raw = std::fs::read_to_string(temp_dir.path().join("bmiHistory.json")).unwrap();
        assert!(raw.starts_with('['));
        assert!(raw.contains("\"timestamp\":42"));
    }
}

//! Records persisted as one JSON document on disk.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::record::{BestRecord, GameSummary, GridKey};
use super::store::{MemoryStore, RecordStore};
use crate::error::StoreError;

/// On-disk layout: key list kept apart from the record map.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    grid_keys: Vec<GridKey>,
    #[serde(default)]
    records: BTreeMap<GridKey, BestRecord>,
}

/// A [`RecordStore`] backed by a JSON file.
///
/// The whole file is rewritten after every mutation, through a sibling
/// `.tmp` file renamed over the old one. A mutation whose write fails is
/// rolled back, so the store never holds records the file lacks. A missing
/// file reads as an empty store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    cache: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`, loading existing records.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let document = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str::<Document>(&text)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Document::default(),
            Err(e) => return Err(e.into()),
        };

        let mut cache = MemoryStore::new();
        cache.load(document.grid_keys, document.records);
        log::debug!("opened record store {} ({} records)", path.display(), cache.len());

        Ok(Self { path, cache })
    }

    /// File backing this store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let grid_keys = self.cache.keys()?;
        let mut records = BTreeMap::new();
        for key in &grid_keys {
            if let Some(record) = self.cache.get(*key)? {
                records.insert(*key, record);
            }
        }

        let text = serde_json::to_string_pretty(&Document { grid_keys, records })?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("tmp");
        let written = write_synced(&temp_path, text.as_bytes())
            .and_then(|()| fs::rename(&temp_path, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        log::debug!("saved {} bytes to {}", text.len(), self.path.display());
        Ok(())
    }

    /// Apply `mutate` to the cache and persist it, restoring the cache if
    /// either step fails.
    fn commit<T>(
        &mut self,
        mutate: impl FnOnce(&mut MemoryStore) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let before = self.cache.clone();
        let result = match mutate(&mut self.cache) {
            Ok(value) => self.flush().map(|()| value),
            Err(e) => Err(e),
        };
        if result.is_err() {
            self.cache = before;
        }
        result
    }
}

fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.flush()?;
    file.sync_all()
}

impl RecordStore for JsonFileStore {
    fn get(&self, key: GridKey) -> Result<Option<BestRecord>, StoreError> {
        self.cache.get(key)
    }

    fn update(&mut self, key: GridKey, summary: &GameSummary) -> Result<BestRecord, StoreError> {
        self.commit(|cache| cache.update(key, summary))
    }

    fn delete(&mut self, key: GridKey) -> Result<bool, StoreError> {
        if self.cache.get(key)?.is_none() {
            return Ok(false);
        }
        self.commit(|cache| cache.delete(key))
    }

    fn wipe(&mut self) -> Result<(), StoreError> {
        self.commit(|cache| cache.wipe())
    }

    fn keys(&self) -> Result<Vec<GridKey>, StoreError> {
        self.cache.keys()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;

    use super::*;

    fn summary(score: u64) -> GameSummary {
        GameSummary {
            score,
            combo: 2,
            efficiency: 75.0,
            turns: 4,
            matches: 3,
            time: Duration::from_secs(30),
            played_at: Utc::now(),
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("records.json")).unwrap();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.update(GridKey::new(4, 4), &summary(400)).unwrap();
        store.update(GridKey::new(2, 2), &summary(100)).unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.keys().unwrap(),
            vec![GridKey::new(4, 4), GridKey::new(2, 2)]
        );
        assert_eq!(
            reopened.get(GridKey::new(4, 4)).unwrap().unwrap().high_score,
            400
        );
    }

    #[test]
    fn test_document_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.update(GridKey::new(3, 4), &summary(250)).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["grid_keys"], serde_json::json!(["3x4"]));
        assert_eq!(value["records"]["3x4"]["high_score"], 250);
        assert_eq!(value["records"]["3x4"]["games_played"], 1);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            JsonFileStore::open(&path),
            Err(StoreError::Json(_))
        ));
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.update(GridKey::new(2, 2), &summary(10)).unwrap();
        store.update(GridKey::new(2, 2), &summary(20)).unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("records.tmp").exists());
    }

    #[test]
    fn test_failed_write_keeps_file_and_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.update(GridKey::new(2, 2), &summary(100)).unwrap();
        let on_disk = fs::read_to_string(&path).unwrap();

        // A directory in the temp file's place makes every write fail.
        fs::create_dir(dir.path().join("records.tmp")).unwrap();

        assert!(matches!(
            store.update(GridKey::new(2, 2), &summary(900)),
            Err(StoreError::Io(_))
        ));
        assert!(store.update(GridKey::new(4, 4), &summary(50)).is_err());
        assert!(store.delete(GridKey::new(2, 2)).is_err());
        assert!(store.wipe().is_err());

        let record = store.get(GridKey::new(2, 2)).unwrap().unwrap();
        assert_eq!(record.high_score, 100);
        assert_eq!(record.games_played, 1);
        assert_eq!(store.keys().unwrap(), vec![GridKey::new(2, 2)]);
        assert_eq!(fs::read_to_string(&path).unwrap(), on_disk);

        fs::remove_dir(dir.path().join("records.tmp")).unwrap();
        let record = store.update(GridKey::new(2, 2), &summary(900)).unwrap();
        assert_eq!(record.games_played, 2);
    }

    #[test]
    fn test_wipe_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.update(GridKey::new(2, 2), &summary(1)).unwrap();
        store.wipe().unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert!(reopened.keys().unwrap().is_empty());
    }
}

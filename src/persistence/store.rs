//! Record store trait and the in-memory store.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::record::{BestRecord, GameSummary, GridKey};
use crate::error::StoreError;

/// Keyed storage for [`BestRecord`]s.
pub trait RecordStore {
    /// Record for `key`, if any game was saved for it.
    fn get(&self, key: GridKey) -> Result<Option<BestRecord>, StoreError>;

    /// Fold `summary` into the record for `key` and return the new record.
    fn update(&mut self, key: GridKey, summary: &GameSummary) -> Result<BestRecord, StoreError>;

    /// Remove the record for `key`. Returns whether one existed.
    fn delete(&mut self, key: GridKey) -> Result<bool, StoreError>;

    /// Remove every record.
    fn wipe(&mut self) -> Result<(), StoreError>;

    /// Keys with a record, in first-saved order.
    fn keys(&self) -> Result<Vec<GridKey>, StoreError>;
}

/// Lets the host keep a handle on a store it hands to a session.
impl<S: RecordStore> RecordStore for Rc<RefCell<S>> {
    fn get(&self, key: GridKey) -> Result<Option<BestRecord>, StoreError> {
        self.borrow().get(key)
    }

    fn update(&mut self, key: GridKey, summary: &GameSummary) -> Result<BestRecord, StoreError> {
        self.borrow_mut().update(key, summary)
    }

    fn delete(&mut self, key: GridKey) -> Result<bool, StoreError> {
        self.borrow_mut().delete(key)
    }

    fn wipe(&mut self) -> Result<(), StoreError> {
        self.borrow_mut().wipe()
    }

    fn keys(&self) -> Result<Vec<GridKey>, StoreError> {
        self.borrow().keys()
    }
}

/// Records kept in process memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    order: Vec<GridKey>,
    records: FxHashMap<GridKey, BestRecord>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no record is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replace the contents with loaded data. Keys without a record are
    /// dropped; records missing from `order` go last.
    pub(crate) fn load(
        &mut self,
        order: Vec<GridKey>,
        records: impl IntoIterator<Item = (GridKey, BestRecord)>,
    ) {
        self.records = records.into_iter().collect();
        self.order.clear();
        for key in order {
            if self.records.contains_key(&key) && !self.order.contains(&key) {
                self.order.push(key);
            }
        }

        let mut stray: Vec<GridKey> = self
            .records
            .keys()
            .filter(|key| !self.order.contains(key))
            .copied()
            .collect();
        stray.sort();
        self.order.extend(stray);
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, key: GridKey) -> Result<Option<BestRecord>, StoreError> {
        Ok(self.records.get(&key).cloned())
    }

    fn update(&mut self, key: GridKey, summary: &GameSummary) -> Result<BestRecord, StoreError> {
        if !self.records.contains_key(&key) {
            self.order.push(key);
        }
        let record = self.records.entry(key).or_default();
        record.apply(summary);
        Ok(record.clone())
    }

    fn delete(&mut self, key: GridKey) -> Result<bool, StoreError> {
        self.order.retain(|k| *k != key);
        Ok(self.records.remove(&key).is_some())
    }

    fn wipe(&mut self) -> Result<(), StoreError> {
        self.order.clear();
        self.records.clear();
        Ok(())
    }

    fn keys(&self) -> Result<Vec<GridKey>, StoreError> {
        Ok(self.order.clone())
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
            combo: 1,
            efficiency: 50.0,
            turns: 4,
            matches: 2,
            time: Duration::from_secs(10),
            played_at: Utc::now(),
        }
    }

    #[test]
    fn test_update_and_get() {
        let mut store = MemoryStore::new();
        let key = GridKey::new(2, 2);

        assert_eq!(store.get(key).unwrap(), None);

        store.update(key, &summary(300)).unwrap();
        let record = store.update(key, &summary(100)).unwrap();

        assert_eq!(record.high_score, 300);
        assert_eq!(record.last_score, 100);
        assert_eq!(store.get(key).unwrap(), Some(record));
    }

    #[test]
    fn test_keys_delete_wipe() {
        let mut store = MemoryStore::new();
        store.update(GridKey::new(4, 4), &summary(1)).unwrap();
        store.update(GridKey::new(2, 2), &summary(1)).unwrap();
        store.update(GridKey::new(4, 4), &summary(1)).unwrap();

        assert_eq!(
            store.keys().unwrap(),
            vec![GridKey::new(4, 4), GridKey::new(2, 2)]
        );

        assert!(store.delete(GridKey::new(4, 4)).unwrap());
        assert!(!store.delete(GridKey::new(4, 4)).unwrap());
        assert_eq!(store.keys().unwrap(), vec![GridKey::new(2, 2)]);

        store.wipe().unwrap();
        assert!(store.is_empty());
        assert!(store.keys().unwrap().is_empty());
    }
}

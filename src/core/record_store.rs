//! Player record storage contract
//!
//! The scheduler and the chat operations only need `get` and `upsert`.
//! Implementations use interior mutability so a store can be shared between
//! the tick loop and the command handlers.

use parking_lot::Mutex;

use super::error::StoreError;
use super::types::PlayerRecord;

pub trait RecordStore {
    /// Record stored under `name`, if any
    fn get(&self, name: &str) -> Result<Option<PlayerRecord>, StoreError>;

    /// Replace the fields of the record with the same `name`, or insert it
    fn upsert(&self, record: PlayerRecord) -> Result<(), StoreError>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn get(&self, name: &str) -> Result<Option<PlayerRecord>, StoreError> {
        (**self).get(name)
    }

    fn upsert(&self, record: PlayerRecord) -> Result<(), StoreError> {
        (**self).upsert(record)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for std::sync::Arc<S> {
    fn get(&self, name: &str) -> Result<Option<PlayerRecord>, StoreError> {
        (**self).get(name)
    }

    fn upsert(&self, record: PlayerRecord) -> Result<(), StoreError> {
        (**self).upsert(record)
    }
}

/// Insert-or-replace on a record list keyed by `name`
///
/// Replacing keeps the stored record's unknown fields; the new record's
/// own unknown fields win on conflict.
pub(crate) fn upsert_into(records: &mut Vec<PlayerRecord>, mut record: PlayerRecord) {
    match records.iter_mut().find(|r| r.name == record.name) {
        Some(existing) => {
            let mut extra = std::mem::take(&mut existing.extra);
            extra.append(&mut record.extra);
            record.extra = extra;
            *existing = record;
        }
        None => records.push(record),
    }
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// Non-persistent store, in insertion order
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<PlayerRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = PlayerRecord>) -> Self {
        let store = Self::new();
        {
            let mut guard = store.records.lock();
            for record in records {
                upsert_into(&mut guard, record);
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<PlayerRecord> {
        self.records.lock().clone()
    }
}

impl RecordStore for MemoryRecordStore {
    fn get(&self, name: &str) -> Result<Option<PlayerRecord>, StoreError> {
        Ok(self.records.lock().iter().find(|r| r.name == name).cloned())
    }

    fn upsert(&self, record: PlayerRecord) -> Result<(), StoreError> {
        upsert_into(&mut self.records.lock(), record);
        Ok(())
    }
}

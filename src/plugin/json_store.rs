//! JSON file record store
//!
//! Records live in a single document shaped like `{"data": [record, ...]}`.
//! Other top-level keys are kept as-is when the document is rewritten.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::core::error::StoreError;
use crate::core::record_store::{upsert_into, RecordStore};
use crate::core::types::PlayerRecord;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RecordDocument {
    #[serde(default)]
    data: Vec<PlayerRecord>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// File-backed [`RecordStore`]; every write rewrites the whole document
#[derive(Debug)]
pub struct JsonRecordStore {
    path: PathBuf,
    document: Mutex<RecordDocument>,
}

impl JsonRecordStore {
    /// Open the document at `path`. A missing or blank file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let document = if path.exists() {
            let contents =
                fs::read_to_string(&path).map_err(|e| StoreError::FileRead(path.clone(), e))?;
            if contents.trim().is_empty() {
                RecordDocument::default()
            } else {
                let mut document: RecordDocument = serde_json::from_str(&contents)
                    .map_err(|e| StoreError::Deserialization(path.clone(), e))?;
                dedupe(&mut document.data);
                document
            }
        } else {
            debug!(path = %path.display(), "[STORE] No record file yet");
            RecordDocument::default()
        };

        info!(
            path = %path.display(),
            records = document.data.len(),
            "[STORE] Opened record file"
        );

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.document.lock().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.lock().data.is_empty()
    }

    /// Write via a temp file and rename, creating the parent directory if needed
    fn persist(&self, document: &RecordDocument) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::CreateDir(parent.to_path_buf(), e))?;
        }

        let json = serde_json::to_string_pretty(document).map_err(StoreError::Serialization)?;
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, json).map_err(|e| StoreError::FileWrite(temp_path.clone(), e))?;
        fs::rename(&temp_path, &self.path)
            .map_err(|e| StoreError::FileRename(temp_path, self.path.clone(), e))
    }
}

/// Keep the first record for each name
fn dedupe(records: &mut Vec<PlayerRecord>) {
    let mut seen = HashSet::new();
    let before = records.len();
    records.retain(|r| seen.insert(r.name.clone()));
    if records.len() != before {
        warn!(
            dropped = before - records.len(),
            "[STORE] Dropped duplicate records"
        );
    }
}

impl RecordStore for JsonRecordStore {
    fn get(&self, name: &str) -> Result<Option<PlayerRecord>, StoreError> {
        Ok(self
            .document
            .lock()
            .data
            .iter()
            .find(|r| r.name == name)
            .cloned())
    }

    /// The in-memory copy only changes once the file write succeeded
    fn upsert(&self, record: PlayerRecord) -> Result<(), StoreError> {
        let mut document = self.document.lock();
        let mut updated = document.clone();
        upsert_into(&mut updated.data, record);
        self.persist(&updated)?;
        *document = updated;
        Ok(())
    }
}

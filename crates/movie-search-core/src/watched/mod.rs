//! Watched list: ordered records, persisted on every mutation.

mod storage;

pub use storage::{FileStorage, MemoryStorage, StorageError, WatchedStorage};

use movie_search_models::WatchedRecord;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Storage key holding the serialized list
pub const WATCHED_KEY: &str = "watched";

#[derive(Debug, Error, PartialEq)]
pub enum WatchedError {
    #[error("watched record has an empty identifier")]
    InvalidId,

    #[error("{field} must be between 0 and 10, got {value}")]
    InvalidRating { field: &'static str, value: f32 },
}

/// Result of an `add` that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// A record with the same identifier already exists; the list is unchanged
    AlreadyWatched,
}

pub struct WatchedListStore {
    storage: Box<dyn WatchedStorage>,
    records: Mutex<Vec<WatchedRecord>>,
}

impl WatchedListStore {
    /// Rehydrate from storage. Absent or unreadable data yields an empty list.
    pub fn load(storage: Box<dyn WatchedStorage>) -> Self {
        let records = match storage.read(WATCHED_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<WatchedRecord>>(&raw) {
                Ok(records) => {
                    info!(count = records.len(), "Loaded watched list");
                    records
                }
                Err(e) => {
                    warn!(error = %e, "Watched list is corrupt, starting empty");
                    backup_corrupt(storage.as_ref());
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("No watched list stored yet");
                Vec::new()
            }
            Err(e) if e.is_corrupt() => {
                warn!(error = %e, "Watched list is corrupt, starting empty");
                backup_corrupt(storage.as_ref());
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read watched list, starting empty");
                Vec::new()
            }
        };

        Self {
            storage,
            records: Mutex::new(records),
        }
    }

    /// Append a record and persist. Duplicate identifiers are rejected.
    pub fn add(&self, record: WatchedRecord) -> Result<AddOutcome, WatchedError> {
        validate(&record)?;

        let mut records = self.lock();
        if records.iter().any(|r| r.id == record.id) {
            debug!(id = %record.id, "Movie already in watched list");
            return Ok(AddOutcome::AlreadyWatched);
        }

        info!(operation = "watched_add", id = %record.id, title = %record.title, "Adding watched movie");
        records.push(record);
        self.persist(&records);
        Ok(AddOutcome::Added)
    }

    /// Remove the record with `id` and persist. Returns whether anything was removed.
    pub fn remove(&self, id: &str) -> bool {
        let mut records = self.lock();
        let before = records.len();
        records.retain(|r| r.id != id);
        let removed = records.len() != before;

        if removed {
            info!(operation = "watched_remove", id, "Removed watched movie");
        } else {
            debug!(id, "Movie not in watched list, nothing to remove");
        }
        self.persist(&records);
        removed
    }

    pub fn records(&self) -> Vec<WatchedRecord> {
        self.lock().clone()
    }

    pub fn get(&self, id: &str) -> Option<WatchedRecord> {
        self.lock().iter().find(|r| r.id == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().iter().any(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<WatchedRecord>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // Called with the records lock held so writes never interleave.
    fn persist(&self, records: &[WatchedRecord]) {
        let result = serde_json::to_string(records)
            .map_err(StorageError::from)
            .and_then(|raw| self.storage.write(WATCHED_KEY, &raw));
        if let Err(e) = result {
            warn!(error = %e, count = records.len(), "Failed to persist watched list");
        }
    }
}

fn backup_corrupt(storage: &dyn WatchedStorage) {
    if let Err(e) = storage.backup(WATCHED_KEY) {
        warn!(error = %e, "Failed to back up corrupt watched list");
    }
}

fn validate(record: &WatchedRecord) -> Result<(), WatchedError> {
    if record.id.trim().is_empty() {
        return Err(WatchedError::InvalidId);
    }
    for (field, value) in [("imdb_rating", record.imdb_rating), ("user_rating", record.user_rating)] {
        if !value.is_finite() || !(0.0..=10.0).contains(&value) {
            return Err(WatchedError::InvalidRating { field, value });
        }
    }
    Ok(())
}

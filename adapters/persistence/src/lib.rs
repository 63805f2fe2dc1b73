#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Persistence adapter that saves session progress to a key-value store.
//!
//! Loading never fails: an absent record yields defaults, an unreadable or
//! malformed record is logged and replaced by defaults, and individual bad
//! fields fall back on their own. Saving is a synchronous upsert of the full
//! record whose failures are logged and never surfaced to the session.

mod record;
mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

use color_match_core::SavedProgress;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Key the session record is stored under.
pub const STORAGE_KEY: &str = "colorMasterGameState_v2";

/// Failures raised while reading or writing the session record.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The store could not be read.
    #[error("failed to read `{key}` from the store")]
    Read {
        /// Key that was being read.
        key: String,
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },
    /// The stored value is not JSON.
    #[error("value stored under `{key}` is not valid JSON")]
    Malformed {
        /// Key holding the malformed value.
        key: String,
        /// Parser failure.
        #[source]
        source: serde_json::Error,
    },
    /// The store could not be written.
    #[error("failed to write `{key}` to the store")]
    Write {
        /// Key that was being written.
        key: String,
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },
    /// The progress could not be serialized.
    #[error("failed to encode the session record")]
    Encode(#[source] serde_json::Error),
}

/// Loads and saves session progress through a [`KeyValueStore`].
#[derive(Debug)]
pub struct Persistence<K> {
    store: K,
    key: String,
}

impl<K: KeyValueStore> Persistence<K> {
    /// Creates an adapter storing the record under [`STORAGE_KEY`].
    #[must_use]
    pub fn new(store: K) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    /// Creates an adapter storing the record under a custom key.
    #[must_use]
    pub fn with_key(store: K, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Provides read-only access to the backing store.
    #[must_use]
    pub fn store(&self) -> &K {
        &self.store
    }

    /// Reads the record, returning `None` when nothing has been saved yet.
    ///
    /// Fields that are present but unusable fall back to their defaults and are
    /// logged; only a failing store or non-JSON text produce an error.
    pub fn try_load(&self) -> Result<Option<SavedProgress>, PersistenceError> {
        let Some(text) = self
            .store
            .get(&self.key)
            .map_err(|source| PersistenceError::Read {
                key: self.key.clone(),
                source,
            })?
        else {
            return Ok(None);
        };

        let decoded = record::decode(&text).map_err(|source| PersistenceError::Malformed {
            key: self.key.clone(),
            source,
        })?;
        if !decoded.fallbacks.is_empty() {
            warn!(
                key = %self.key,
                fields = ?decoded.fallbacks,
                "stored session fields were unusable; defaults applied"
            );
        }
        Ok(Some(decoded.progress))
    }

    /// Reads the record, recovering from every failure with defaults.
    ///
    /// Malformed records are removed from the store so the next save starts clean.
    pub fn load(&mut self) -> SavedProgress {
        match self.try_load() {
            Ok(Some(progress)) => {
                debug!(key = %self.key, "session progress loaded");
                progress
            }
            Ok(None) => SavedProgress::default(),
            Err(failure @ PersistenceError::Malformed { .. }) => {
                warn!(error = %failure, "discarding malformed session record");
                if let Err(source) = self.store.remove(&self.key) {
                    warn!(error = %source, key = %self.key, "failed to remove malformed record");
                }
                SavedProgress::default()
            }
            Err(failure) => {
                warn!(error = %failure, "session progress unavailable; using defaults");
                SavedProgress::default()
            }
        }
    }

    /// Writes the full record, replacing any previous value.
    pub fn try_save(&mut self, progress: &SavedProgress) -> Result<(), PersistenceError> {
        let text = record::encode(progress).map_err(PersistenceError::Encode)?;
        self.store
            .set(&self.key, &text)
            .map_err(|source| PersistenceError::Write {
                key: self.key.clone(),
                source,
            })
    }

    /// Writes the full record, logging any failure instead of returning it.
    pub fn save(&mut self, progress: &SavedProgress) {
        match self.try_save(progress) {
            Ok(()) => debug!(key = %self.key, round = %progress.round, "session progress saved"),
            Err(failure) => error!(error = %failure, "failed to save session progress"),
        }
    }
}

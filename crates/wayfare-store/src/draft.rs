//! Local draft cache for in-progress itinerary edits.
//!
//! Drafts live independently of the authoritative trip store copy: one
//! JSON snapshot file per trip id under the cache directory, named
//! `<namespace>_<tripId>.json`. The cache is a pass-through -- it enforces
//! no trip invariants (those are the reducer's responsibility) -- but it
//! does track the "has unsaved changes" flag: every `save` sets it, and
//! only `clear` (successful save upstream, or an explicit discard) resets
//! it.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{DRAFT_NAMESPACE, StoreConfig};
use crate::models::Trip;

/// Errors from draft cache operations.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("failed to create cache directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write draft {key}: {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read draft {key}: {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove draft {key}: {source}")]
    Remove {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("draft {key} could not be encoded: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("draft {key} is not a valid trip snapshot: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Keyed file-backed cache of draft trip snapshots.
#[derive(Debug)]
pub struct DraftStore {
    cache_dir: PathBuf,
    /// Trip ids with changes not yet reconciled to the trip store.
    dirty: HashSet<String>,
}

impl DraftStore {
    /// Open a draft store rooted at the configured cache directory. The
    /// directory is created lazily on first write.
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            cache_dir: config.cache_dir.clone(),
            dirty: HashSet::new(),
        }
    }

    /// Open a draft store rooted at an explicit directory (tests).
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: dir.into(),
            dirty: HashSet::new(),
        }
    }

    /// Cache key for a trip id: `<namespace>_<tripId>`.
    pub fn key(trip_id: &str) -> String {
        format!("{DRAFT_NAMESPACE}_{trip_id}")
    }

    fn path(&self, trip_id: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", Self::key(trip_id)))
    }

    /// Persist a snapshot and flip the unsaved flag for this trip id.
    pub fn save(&mut self, trip_id: &str, snapshot: &Trip) -> Result<(), DraftError> {
        let key = Self::key(trip_id);
        fs::create_dir_all(&self.cache_dir).map_err(|source| DraftError::CreateDir {
            path: self.cache_dir.clone(),
            source,
        })?;

        let text = serde_json::to_string(snapshot).map_err(|source| DraftError::Encode {
            key: key.clone(),
            source,
        })?;
        fs::write(self.path(trip_id), text).map_err(|source| DraftError::Write {
            key: key.clone(),
            source,
        })?;

        self.dirty.insert(trip_id.to_owned());
        tracing::debug!(trip_id = %trip_id, key = %key, "draft snapshot saved");
        Ok(())
    }

    /// Load the cached snapshot for a trip id, or `None` if there is no
    /// draft.
    pub fn load(&self, trip_id: &str) -> Result<Option<Trip>, DraftError> {
        let key = Self::key(trip_id);
        let path = self.path(trip_id);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(DraftError::Read { key, source }),
        };
        let trip = serde_json::from_str(&text).map_err(|source| DraftError::Corrupt {
            key,
            source,
        })?;
        Ok(Some(trip))
    }

    /// Drop the draft for a trip id and reset its unsaved flag. Removing a
    /// draft that does not exist is not an error.
    pub fn clear(&mut self, trip_id: &str) -> Result<(), DraftError> {
        let key = Self::key(trip_id);
        match fs::remove_file(self.path(trip_id)) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => return Err(DraftError::Remove { key: key.clone(), source }),
        }
        self.dirty.remove(trip_id);
        tracing::debug!(trip_id = %trip_id, key = %key, "draft cleared");
        Ok(())
    }

    /// Whether this trip id has changes not yet reconciled to the trip
    /// store.
    pub fn has_unsaved(&self, trip_id: &str) -> bool {
        self.dirty.contains(trip_id)
    }

    /// The directory draft files are written to.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }
}

// Unit tests that depend on `wayfare-test-utils` fixtures live in
// `tests/draft_test.rs`: the fixtures crate path-depends on this crate, so
// using them from an inline `#[cfg(test)]` module would link two copies of
// `wayfare-store` (the lib-under-test and the fixtures' dependency) and the
// shared `Trip` types would not unify. As an integration test there is a
// single external `wayfare-store`, so the types match.

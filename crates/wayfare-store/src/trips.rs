//! The authoritative trip store -- the external persistence collaborator.
//!
//! The editing core only ever talks to [`TripStore`]; the concrete backend
//! is injected. [`FileTripStore`] keeps one JSON document per trip id under
//! the data directory; [`MemoryTripStore`] backs tests and offline use.
//! Neither the trait nor its implementations retry failed saves -- the
//! caller decides.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::models::{Hotel, TripData, UserSelection};

/// Errors from the trip store, mirroring the save call's exit surface:
/// validation (400-class), missing trip (404), unexpected (500-class).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid save request: {0}")]
    Validation(String),

    #[error("trip {0} not found")]
    NotFound(String),

    #[error("trip store failure: {0}")]
    Internal(String),

    #[error("trip store I/O failure: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Body of a save call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRequest {
    /// Absent for a first save (insert); present for an update. Temporary
    /// `temp_` ids are treated as absent.
    #[serde(rename = "tripId", default, skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,
    #[serde(rename = "userEmail")]
    pub user_email: String,
    #[serde(rename = "userSelection")]
    pub user_selection: UserSelection,
    #[serde(rename = "tripData")]
    pub trip_data: TripData,
    #[serde(rename = "selectedHotels")]
    pub selected_hotels: Vec<Hotel>,
}

/// Response to a successful save call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(rename = "tripId")]
    pub trip_id: String,
    #[serde(default)]
    pub message: String,
}

/// The persisted document shape: the save request body minus the caller's
/// id field, keyed by the store-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTrip {
    #[serde(rename = "tripId")]
    pub trip_id: String,
    #[serde(rename = "userEmail")]
    pub user_email: String,
    #[serde(rename = "userSelection")]
    pub user_selection: UserSelection,
    #[serde(rename = "tripData")]
    pub trip_data: TripData,
    #[serde(rename = "selectedHotels")]
    pub selected_hotels: Vec<Hotel>,
}

/// Adapter interface for the external persistence collaborator.
///
/// Object-safe so callers can hold `Box<dyn TripStore>` / `&dyn TripStore`.
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Persist a trip document. Inserts mint a permanent id; updates merge
    /// into the existing document and fail with [`StoreError::NotFound`]
    /// if the id no longer exists.
    async fn save(&self, request: &SaveRequest) -> Result<SaveResponse, StoreError>;

    /// Load a previously persisted trip by permanent id.
    async fn load(&self, trip_id: &str) -> Result<Option<StoredTrip>, StoreError>;
}

// Compile-time assertion: TripStore must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn TripStore) {}
};

/// Whether a trip id is a pre-save placeholder rather than a store id.
pub fn is_temp_id(trip_id: &str) -> bool {
    trip_id.starts_with("temp_")
}

fn validate(request: &SaveRequest) -> Result<(), StoreError> {
    if request.user_email.trim().is_empty() {
        return Err(StoreError::Validation("missing user email".to_owned()));
    }
    if request.selected_hotels.is_empty() {
        return Err(StoreError::Validation("no hotel selected".to_owned()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// Trip store backed by one JSON document per trip id under the data
/// directory.
#[derive(Debug)]
pub struct FileTripStore {
    data_dir: PathBuf,
}

impl FileTripStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
        }
    }

    /// Open a store rooted at an explicit directory (tests).
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: dir.into() }
    }

    fn path(&self, trip_id: &str) -> PathBuf {
        self.data_dir.join(format!("{trip_id}.json"))
    }
}

#[async_trait]
impl TripStore for FileTripStore {
    async fn save(&self, request: &SaveRequest) -> Result<SaveResponse, StoreError> {
        validate(request)?;

        let (trip_id, message) = match request.trip_id.as_deref().filter(|id| !is_temp_id(id)) {
            Some(existing) => {
                if !self.path(existing).exists() {
                    return Err(StoreError::NotFound(existing.to_owned()));
                }
                (existing.to_owned(), "trip updated".to_owned())
            }
            None => (Uuid::new_v4().to_string(), "trip created".to_owned()),
        };

        let stored = StoredTrip {
            trip_id: trip_id.clone(),
            user_email: request.user_email.clone(),
            user_selection: request.user_selection.clone(),
            trip_data: request.trip_data.clone(),
            selected_hotels: request.selected_hotels.clone(),
        };

        fs::create_dir_all(&self.data_dir)?;
        let text = serde_json::to_string_pretty(&stored)
            .map_err(|e| StoreError::Internal(format!("failed to serialize trip: {e}")))?;
        fs::write(self.path(&trip_id), text)?;

        tracing::info!(trip_id = %trip_id, "trip document persisted");
        Ok(SaveResponse {
            success: true,
            trip_id,
            message,
        })
    }

    async fn load(&self, trip_id: &str) -> Result<Option<StoredTrip>, StoreError> {
        let text = match fs::read_to_string(self.path(trip_id)) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored = serde_json::from_str(&text)
            .map_err(|e| StoreError::Internal(format!("corrupt trip document {trip_id}: {e}")))?;
        Ok(Some(stored))
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// In-memory trip store for tests and offline runs.
#[derive(Debug, Default)]
pub struct MemoryTripStore {
    trips: Mutex<HashMap<String, StoredTrip>>,
    /// When set, every save fails with an internal error (for exercising
    /// failure paths).
    fail_saves: bool,
}

impl MemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose saves always fail.
    pub fn failing() -> Self {
        Self {
            trips: Mutex::new(HashMap::new()),
            fail_saves: true,
        }
    }

    /// Number of documents currently held.
    pub async fn len(&self) -> usize {
        self.trips.lock().await.len()
    }

    /// Whether the store holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.trips.lock().await.is_empty()
    }
}

#[async_trait]
impl TripStore for MemoryTripStore {
    async fn save(&self, request: &SaveRequest) -> Result<SaveResponse, StoreError> {
        validate(request)?;
        if self.fail_saves {
            return Err(StoreError::Internal("simulated store outage".to_owned()));
        }

        let mut trips = self.trips.lock().await;
        let (trip_id, message) = match request.trip_id.as_deref().filter(|id| !is_temp_id(id)) {
            Some(existing) => {
                if !trips.contains_key(existing) {
                    return Err(StoreError::NotFound(existing.to_owned()));
                }
                (existing.to_owned(), "trip updated".to_owned())
            }
            None => (Uuid::new_v4().to_string(), "trip created".to_owned()),
        };

        trips.insert(
            trip_id.clone(),
            StoredTrip {
                trip_id: trip_id.clone(),
                user_email: request.user_email.clone(),
                user_selection: request.user_selection.clone(),
                trip_data: request.trip_data.clone(),
                selected_hotels: request.selected_hotels.clone(),
            },
        );

        Ok(SaveResponse {
            success: true,
            trip_id,
            message,
        })
    }

    async fn load(&self, trip_id: &str) -> Result<Option<StoredTrip>, StoreError> {
        Ok(self.trips.lock().await.get(trip_id).cloned())
    }
}

// Unit tests that depend on `wayfare-test-utils` fixtures live in
// `tests/trips_test.rs`: the fixtures crate path-depends on this crate, so
// using them from an inline `#[cfg(test)]` module would link two copies of
// `wayfare-store` and the shared model types would not unify. As an
// integration test there is a single external `wayfare-store`.

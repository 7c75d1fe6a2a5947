//! Injected id generation.
//!
//! Activity ids and temporary trip ids are minted through a trait so the
//! editing core never reaches for ambient entropy and tests can supply
//! deterministic ids.

use chrono::Utc;
use uuid::Uuid;

/// Supplier of activity ids and temporary trip ids.
pub trait IdGenerator: Send + Sync {
    /// Mint a fresh activity id, unique within the trip for the lifetime
    /// of the draft. Old ids are never reused.
    fn activity_id(&self) -> String;

    /// Mint a temporary trip id for a trip that has never been saved.
    fn temp_trip_id(&self) -> String;
}

/// Production id generator: v4 UUIDs for activities, millisecond-stamped
/// `temp_` ids for unsaved trips.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn activity_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    fn temp_trip_id(&self) -> String {
        format!("temp_{}", Utc::now().timestamp_millis())
    }
}

//! The edit session: the single mutable "current draft" reference.
//!
//! Every mutation entry point reads the latest snapshot, computes a
//! replacement through the reducer or the hotel synchronizer, replaces it
//! atomically, and persists the new snapshot through the draft store.
//! Rust's `&mut self` receivers enforce the no-interleaving rule of the
//! original event model at compile time; the one asynchronous boundary
//! (saving to the trip store) lives in [`crate::save`].
//!
//! The collaborators are injected -- the draft store and the id
//! generator arrive from outside -- so nothing here touches ambient
//! global state.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;

use wayfare_store::draft::{DraftError, DraftStore};
use wayfare_store::ids::IdGenerator;
use wayfare_store::models::{Activity, Hotel, Itinerary, SlotName, Trip};
use wayfare_store::trips::TripStore;

use crate::hotel;
use crate::moves::{self, MoveError, MoveRequest, SlotRef};
use crate::reduce;
use crate::save::{self, SaveError};

/// Errors from session operations. A rejected edit leaves the snapshot
/// byte-for-byte unchanged; a draft persistence failure leaves the
/// in-memory snapshot already advanced.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Draft(#[from] DraftError),
}

/// An open editing session over one trip draft.
pub struct EditSession {
    trip: Trip,
    selected_hotel: Option<Hotel>,
    drafts: DraftStore,
    ids: Arc<dyn IdGenerator>,
    /// Set while a drag gesture is in progress, so transient navigation
    /// events do not raise the unsaved-changes warning mid-drag.
    dragging: bool,
}

impl EditSession {
    /// Open a session over a trip. A trip that has never been saved gets
    /// a temporary id; the draft store is keyed by it from here on.
    pub fn open(mut trip: Trip, drafts: DraftStore, ids: Arc<dyn IdGenerator>) -> Self {
        if trip.id.is_none() {
            let temp = ids.temp_trip_id();
            tracing::debug!(trip_id = %temp, "assigned temporary trip id");
            trip.id = Some(temp);
        }
        Self {
            trip,
            selected_hotel: None,
            drafts,
            ids,
            dragging: false,
        }
    }

    /// Resume a session from a cached draft, if one exists for the id.
    pub fn resume(
        trip_id: &str,
        drafts: DraftStore,
        ids: Arc<dyn IdGenerator>,
    ) -> Result<Option<Self>, DraftError> {
        let Some(trip) = drafts.load(trip_id)? else {
            return Ok(None);
        };
        Ok(Some(Self::open(trip, drafts, ids)))
    }

    /// The current snapshot.
    pub fn trip(&self) -> &Trip {
        &self.trip
    }

    /// The draft key for this session's trip.
    pub fn trip_id(&self) -> &str {
        self.trip.id.as_deref().unwrap_or_default()
    }

    /// The currently selected hotel, if any.
    pub fn selected_hotel(&self) -> Option<&Hotel> {
        self.selected_hotel.as_ref()
    }

    /// Whether this draft has changes not yet saved to the trip store.
    pub fn has_unsaved_changes(&self) -> bool {
        self.drafts.has_unsaved(self.trip_id())
    }

    /// Whether leaving now should warn about unsaved work. Suppressed
    /// while a drag gesture is in flight.
    pub fn should_warn_unsaved(&self) -> bool {
        self.has_unsaved_changes() && !self.dragging
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    /// End a drag gesture. A cancelled drag mutates nothing; only a drop
    /// that reached [`Self::move_activity`] did.
    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Validate and apply a move, then persist the new snapshot.
    pub fn move_activity(&mut self, request: &MoveRequest) -> Result<(), SessionError> {
        let approved = moves::validate(&self.trip.trip_data.itinerary, request)?;
        let next = reduce::apply(&self.trip.trip_data.itinerary, &approved, self.ids.as_ref());
        self.replace_itinerary(next)
    }

    /// Insert a new activity, then persist the new snapshot.
    pub fn add_activity(
        &mut self,
        day: NaiveDate,
        slot: SlotName,
        index: Option<usize>,
        activity: Activity,
    ) -> Result<(), SessionError> {
        let next = reduce::add_activity(
            &self.trip.trip_data.itinerary,
            day,
            slot,
            index,
            activity,
            self.ids.as_ref(),
        )?;
        self.replace_itinerary(next)
    }

    /// Remove an activity, then persist the new snapshot.
    pub fn remove_activity(&mut self, at: &SlotRef) -> Result<(), SessionError> {
        let next = reduce::remove_activity(&self.trip.trip_data.itinerary, at)?;
        self.replace_itinerary(next)
    }

    /// Remove a whole day, re-run the hotel synchronizer (the first/last
    /// day may have changed), then persist the new snapshot.
    pub fn remove_day(&mut self, day: NaiveDate) -> Result<(), SessionError> {
        let mut next = reduce::remove_day(&self.trip.trip_data.itinerary, day)?;
        if let Some(selected) = &self.selected_hotel {
            next = hotel::sync(&next, selected);
        }
        self.replace_itinerary(next)
    }

    /// Select a hotel and rebind the check-in/out activities to it.
    pub fn select_hotel(&mut self, selected: Hotel) -> Result<(), SessionError> {
        let next = hotel::sync(&self.trip.trip_data.itinerary, &selected);
        self.selected_hotel = Some(selected);
        self.replace_itinerary(next)
    }

    /// Add a hotel option to the trip, or refresh the existing record when
    /// the new one describes the same entity (see [`hotel::same_hotel`]).
    /// Refreshing the currently selected hotel re-syncs the check-in/out
    /// binding. Returns whether an existing record was refreshed.
    pub fn add_hotel_option(&mut self, option: Hotel) -> Result<bool, SessionError> {
        let hotels = &mut self.trip.trip_data.hotels;
        let refreshed = match hotels.iter_mut().find(|h| hotel::same_hotel(h, &option)) {
            Some(existing) => {
                *existing = option.clone();
                true
            }
            None => {
                hotels.push(option.clone());
                false
            }
        };

        if self
            .selected_hotel
            .as_ref()
            .is_some_and(|s| hotel::same_hotel(s, &option))
        {
            self.trip.trip_data.itinerary = hotel::sync(&self.trip.trip_data.itinerary, &option);
            self.selected_hotel = Some(option);
        }

        let id = self.trip_id().to_owned();
        self.drafts.save(&id, &self.trip)?;
        Ok(refreshed)
    }

    /// Reconcile the draft against the trip store. On success the draft
    /// entry is cleared, the unsaved flag resets, and the session adopts
    /// the permanent trip id.
    pub async fn save(
        &mut self,
        user_email: &str,
        store: &dyn TripStore,
    ) -> Result<String, SaveError> {
        let hotels: Vec<Hotel> = self.selected_hotel.iter().cloned().collect();
        let permanent_id = save::save_trip(
            &self.trip,
            &hotels,
            user_email,
            store,
            &mut self.drafts,
        )
        .await?;
        self.trip.id = Some(permanent_id.clone());
        Ok(permanent_id)
    }

    /// Discard the draft entirely, consuming the session.
    pub fn discard(mut self) -> Result<(), DraftError> {
        let id = self.trip_id().to_owned();
        self.drafts.clear(&id)?;
        tracing::info!(trip_id = %id, "draft discarded");
        Ok(())
    }

    /// Replace the current snapshot and persist it. The replacement
    /// happens before the write, so a persistence failure never leaves a
    /// half-applied edit in memory.
    fn replace_itinerary(&mut self, next: Itinerary) -> Result<(), SessionError> {
        self.trip.trip_data.itinerary = next;
        let id = self.trip_id().to_owned();
        self.drafts.save(&id, &self.trip)?;
        Ok(())
    }
}

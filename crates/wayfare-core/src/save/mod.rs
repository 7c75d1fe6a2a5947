//! Save reconciliation.
//!
//! Validates the draft, prepares the outgoing document (internal activity
//! ids stripped, absolute timestamps stamped), submits it to the trip
//! store, and clears the draft only after the store confirms. A store
//! failure leaves the draft untouched so no work is lost; validation
//! failures block the call before any store effect.

use chrono::NaiveDate;
use thiserror::Error;

use wayfare_store::draft::{DraftError, DraftStore};
use wayfare_store::models::{Activity, Hotel, Trip, TripData};
use wayfare_store::trips::{SaveRequest, StoreError, TripStore, is_temp_id};

use crate::schedule;

/// Errors from save reconciliation.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("exactly one hotel must be selected")]
    NoHotelSelected,

    #[error("itinerary days have no activities: {}", format_days(.0))]
    EmptyDays(Vec<NaiveDate>),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Draft(#[from] DraftError),
}

fn format_days(days: &[NaiveDate]) -> String {
    days.iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate and submit a draft trip, returning the permanent trip id.
///
/// Preconditions (checked before any store effect):
/// - exactly one hotel is selected;
/// - no day has zero activities across all of its slots.
///
/// On success the draft entry for this trip id is cleared, which also
/// resets the unsaved-changes flag.
pub async fn save_trip(
    trip: &Trip,
    selected_hotels: &[Hotel],
    user_email: &str,
    store: &dyn TripStore,
    drafts: &mut DraftStore,
) -> Result<String, SaveError> {
    if selected_hotels.len() != 1 {
        return Err(SaveError::NoHotelSelected);
    }

    let empty_days: Vec<NaiveDate> = trip
        .trip_data
        .itinerary
        .iter()
        .filter(|(_, day)| day.is_empty())
        .map(|(key, _)| *key)
        .collect();
    if !empty_days.is_empty() {
        return Err(SaveError::EmptyDays(empty_days));
    }

    let request = SaveRequest {
        trip_id: trip.id.clone().filter(|id| !is_temp_id(id)),
        user_email: user_email.to_owned(),
        user_selection: trip.user_selection.clone(),
        trip_data: prepare_trip_data(&trip.trip_data),
        selected_hotels: selected_hotels.to_vec(),
    };

    let response = store.save(&request).await?;
    tracing::info!(
        trip_id = %response.trip_id,
        message = %response.message,
        "trip reconciled to store"
    );

    // Only a confirmed save clears the draft; failures above keep it.
    if let Some(draft_id) = trip.id.as_deref() {
        drafts.clear(draft_id)?;
    }

    Ok(response.trip_id)
}

/// The persisted copy of the trip data: ephemeral activity ids stripped,
/// absolute `StartDateTime`/`EndDateTime` stamped from each activity's
/// `TimeSlot` in the trip's timezone. A failed stamp is logged and the
/// activity keeps only its human-readable fields.
fn prepare_trip_data(data: &TripData) -> TripData {
    let mut prepared = data.clone();
    for (key, day) in prepared.itinerary.iter_mut() {
        let day_key = *key;
        for slot in [&mut day.morning, &mut day.afternoon, &mut day.evening]
            .into_iter()
            .flatten()
        {
            for activity in slot.activities.iter_mut() {
                prepare_activity(activity, day_key, &data.timezone);
            }
        }
        if let Some(lunch) = day.lunch.as_mut() {
            prepare_activity(&mut lunch.activity, day_key, &data.timezone);
        }
    }
    prepared
}

fn prepare_activity(activity: &mut Activity, day: NaiveDate, timezone: &str) {
    activity.id = None;
    match schedule::stamp(day, &activity.time_slot, timezone) {
        Ok((start, end)) => {
            activity.start_date_time = Some(start);
            activity.end_date_time = Some(end);
        }
        Err(e) => {
            tracing::warn!(
                day = %day,
                place = %activity.place_name,
                error = %e,
                "schedule stamp failed; persisting human-readable times only"
            );
            activity.start_date_time = None;
            activity.end_date_time = None;
        }
    }
}

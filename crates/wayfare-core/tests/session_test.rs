//! Integration tests for the edit session.
//!
//! These exercise the read-then-replace snapshot protocol, draft
//! persistence and the unsaved-changes flag, the drag guard, hotel
//! selection, and end-to-end save through the session.

use std::sync::Arc;

use chrono::Days;

use wayfare_store::draft::DraftStore;
use wayfare_store::models::SlotName;
use wayfare_store::trips::MemoryTripStore;

use wayfare_core::moves::{MoveRequest, SlotRef};
use wayfare_core::session::{EditSession, SessionError};

use wayfare_test_utils::SeqIds;
use wayfare_test_utils::fixtures;

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn session_in(dir: &tempfile::TempDir, days: usize) -> EditSession {
    EditSession::open(
        fixtures::trip_with_days(days),
        DraftStore::at(dir.path()),
        Arc::new(SeqIds::new()),
    )
}

fn at(offset: u64, slot: SlotName, index: usize) -> SlotRef {
    SlotRef {
        day: fixtures::first_day() + Days::new(offset),
        slot,
        index,
    }
}

// ---------------------------------------------------------------------------
// Snapshot lifecycle
// ---------------------------------------------------------------------------

#[test]
fn opening_an_unsaved_trip_assigns_a_temp_id() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(&dir, 2);
    assert!(session.trip_id().starts_with("temp_"));
    // Materializing the draft is not an edit.
    assert!(!session.has_unsaved_changes());
}

#[test]
fn a_successful_move_replaces_the_snapshot_and_persists_the_draft() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(&dir, 3);
    let d2 = fixtures::first_day() + Days::new(1);

    session
        .move_activity(&MoveRequest {
            from: at(1, SlotName::Morning, 0),
            to: at(1, SlotName::Morning, 1),
        })
        .unwrap();

    assert!(session.has_unsaved_changes());
    let morning = session.trip().trip_data.itinerary[&d2].morning.as_ref().unwrap();
    assert_eq!(morning.activities[0].place_name, "Nakamise Street");

    // The draft on disk is the replaced snapshot.
    let reload = DraftStore::at(dir.path())
        .load(session.trip_id())
        .unwrap()
        .unwrap();
    assert_eq!(&reload, session.trip());
}

#[test]
fn a_rejected_move_leaves_the_snapshot_byte_for_byte_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(&dir, 3);
    let before = session.trip().clone();

    let err = session
        .move_activity(&MoveRequest {
            from: at(1, SlotName::Evening, 0),
            to: at(2, SlotName::Afternoon, 0),
        })
        .unwrap_err();

    assert!(matches!(err, SessionError::Move(_)));
    assert_eq!(session.trip(), &before);
    assert!(!session.has_unsaved_changes());
}

#[test]
fn sequential_edits_compound_on_the_latest_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(&dir, 3);
    let d3 = fixtures::first_day() + Days::new(2);

    session
        .add_activity(
            d3,
            SlotName::Evening,
            None,
            fixtures::activity("x", "Golden Gai", "", ""),
        )
        .unwrap();
    session
        .add_activity(
            d3,
            SlotName::Evening,
            None,
            fixtures::activity("y", "Omoide Yokocho", "", ""),
        )
        .unwrap();

    let evening = session.trip().trip_data.itinerary[&d3].evening.as_ref().unwrap();
    assert_eq!(evening.activities.len(), 2);
    assert_eq!(evening.activities[0].time_slot, "6:00 PM - 8:00 PM");
    assert_eq!(evening.activities[1].time_slot, "8:00 PM - 10:00 PM");
}

#[test]
fn resume_restores_the_cached_draft() {
    let dir = tempfile::tempdir().unwrap();
    let trip_id;
    {
        let mut session = session_in(&dir, 3);
        trip_id = session.trip_id().to_owned();
        session
            .add_activity(
                fixtures::first_day(),
                SlotName::Lunch,
                None,
                fixtures::activity("x", "Tsukemen Rokurinsha", "", ""),
            )
            .unwrap();
    }

    let resumed = EditSession::resume(
        &trip_id,
        DraftStore::at(dir.path()),
        Arc::new(SeqIds::new()),
    )
    .unwrap()
    .expect("draft exists");
    assert!(
        resumed.trip().trip_data.itinerary[&fixtures::first_day()]
            .lunch
            .is_some()
    );

    assert!(
        EditSession::resume(
            "temp_unknown",
            DraftStore::at(dir.path()),
            Arc::new(SeqIds::new()),
        )
        .unwrap()
        .is_none()
    );
}

// ---------------------------------------------------------------------------
// Drag guard
// ---------------------------------------------------------------------------

#[test]
fn the_drag_guard_suppresses_the_unsaved_warning_mid_gesture() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(&dir, 3);

    session
        .move_activity(&MoveRequest {
            from: at(1, SlotName::Morning, 0),
            to: at(1, SlotName::Morning, 1),
        })
        .unwrap();
    assert!(session.should_warn_unsaved());

    session.begin_drag();
    assert!(session.has_unsaved_changes());
    assert!(!session.should_warn_unsaved());

    // A cancelled drag mutates nothing and restores the warning.
    let before = session.trip().clone();
    session.end_drag();
    assert_eq!(session.trip(), &before);
    assert!(session.should_warn_unsaved());
}

// ---------------------------------------------------------------------------
// Hotel selection
// ---------------------------------------------------------------------------

#[test]
fn selecting_a_hotel_rebinds_only_the_checkin_and_checkout() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(&dir, 3);
    let before = session.trip().clone();

    session.select_hotel(fixtures::hotel("Park Hyatt Tokyo")).unwrap();

    let first = fixtures::first_day();
    let d2 = first + Days::new(1);
    let last = first + Days::new(2);
    let after = &session.trip().trip_data.itinerary;

    let checkin = &after[&first].afternoon.as_ref().unwrap().activities[0];
    assert_eq!(checkin.place_details, "Check-in at Park Hyatt Tokyo");
    let checkout = &after[&last].morning.as_ref().unwrap().activities[0];
    assert_eq!(checkout.place_details, "Check-out from Park Hyatt Tokyo");

    // Everything else is byte-identical.
    assert_eq!(after[&d2], before.trip_data.itinerary[&d2]);
    assert_eq!(
        after[&first].evening,
        before.trip_data.itinerary[&first].evening
    );
    assert!(session.has_unsaved_changes());
}

#[test]
fn adding_a_hotel_option_dedupes_by_identity() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(&dir, 3);
    assert_eq!(session.trip().trip_data.hotels.len(), 2);

    // A provider record for the same hotel (accented spelling, provider
    // token absent on the existing record) refreshes rather than
    // duplicates.
    let mut refreshed = fixtures::hotel("HÔTEL GRACERY SHINJUKU");
    refreshed.rating = Some(4.6);
    assert!(session.add_hotel_option(refreshed).unwrap());
    assert_eq!(session.trip().trip_data.hotels.len(), 2);
    assert_eq!(session.trip().trip_data.hotels[0].rating, Some(4.6));

    // A genuinely new hotel is appended.
    assert!(!session.add_hotel_option(fixtures::hotel("Aman Tokyo")).unwrap());
    assert_eq!(session.trip().trip_data.hotels.len(), 3);
    assert!(session.has_unsaved_changes());
}

#[test]
fn refreshing_the_selected_hotel_resyncs_the_binding() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(&dir, 3);
    session.select_hotel(fixtures::hotel(fixtures::FIXTURE_HOTEL)).unwrap();

    let mut updated = fixtures::hotel(fixtures::FIXTURE_HOTEL);
    updated.hotel_image_url = "https://example.com/new-facade.jpg".to_owned();
    session.add_hotel_option(updated).unwrap();

    let first = fixtures::first_day();
    let checkin = &session.trip().trip_data.itinerary[&first]
        .afternoon
        .as_ref()
        .unwrap()
        .activities[0];
    assert_eq!(checkin.image_url, "https://example.com/new-facade.jpg");
}

#[test]
fn removing_the_last_day_moves_the_checkout_binding_target() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(&dir, 3);
    session.select_hotel(fixtures::hotel("Park Hyatt Tokyo")).unwrap();

    let last = fixtures::first_day() + Days::new(2);
    session.remove_day(last).unwrap();

    let itinerary = &session.trip().trip_data.itinerary;
    assert_eq!(itinerary.len(), 2);
    // The old day-2 is now the last day; it has no checkout activity, so
    // the re-sync is a defensive no-op rather than an invention.
    let new_last = fixtures::first_day() + Days::new(1);
    assert!(itinerary[&new_last].morning.as_ref().is_some_and(|m| {
        m.activities
            .iter()
            .all(|a| !a.activity_type.is_immutable())
    }));
}

// ---------------------------------------------------------------------------
// Save through the session
// ---------------------------------------------------------------------------

#[tokio::test]
async fn saving_through_the_session_adopts_the_permanent_id() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(&dir, 3);
    session.select_hotel(fixtures::hotel(fixtures::FIXTURE_HOTEL)).unwrap();
    assert!(session.has_unsaved_changes());

    let store = MemoryTripStore::new();
    let permanent = session.save("traveler@example.com", &store).await.unwrap();

    assert_eq!(session.trip_id(), permanent);
    assert!(!permanent.starts_with("temp_"));
    assert!(!session.has_unsaved_changes());
}

#[tokio::test]
async fn saving_without_selecting_a_hotel_fails_and_keeps_the_draft() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(&dir, 3);
    session
        .add_activity(
            fixtures::first_day(),
            SlotName::Lunch,
            None,
            fixtures::activity("x", "Ramen Nagi", "", ""),
        )
        .unwrap();

    let store = MemoryTripStore::new();
    let err = session.save("traveler@example.com", &store).await.unwrap_err();
    assert!(matches!(err, wayfare_core::save::SaveError::NoHotelSelected));
    assert!(session.has_unsaved_changes());
    assert!(session.trip_id().starts_with("temp_"));
}

#[test]
fn discarding_deletes_the_draft() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(&dir, 2);
    session
        .add_activity(
            fixtures::first_day(),
            SlotName::Lunch,
            None,
            fixtures::activity("x", "Afuri", "", ""),
        )
        .unwrap();
    let trip_id = session.trip_id().to_owned();

    session.discard().unwrap();

    assert!(
        DraftStore::at(dir.path())
            .load(&trip_id)
            .unwrap()
            .is_none()
    );
}

//! The itinerary reducer.
//!
//! Pure `(itinerary, command) -> itinerary` application of structural
//! edits. The reducer never mutates its input: it clones, edits the
//! clone, reflows every touched slot, and returns the new value, so the
//! draft store can distinguish "changed" from "unchanged" and no partial
//! write can ever be observed.
//!
//! Moves must already be validated (see [`crate::moves`]); add/remove
//! re-check their own preconditions because they have no separate
//! validation step.

use chrono::NaiveDate;

use wayfare_store::ids::IdGenerator;
use wayfare_store::models::{
    Activity, ActivitySlot, Day, Itinerary, LunchSlot, SlotName,
};

use crate::moves::{ApprovedMove, MoveError, SlotRef};
use crate::schedule::{reflow_lunch, reflow_slot};

/// Number of leading activities pinned in place (hotel check-in/out).
/// Insertions and reorders may never land inside this prefix, which keeps
/// the pinned activities at stable indices.
fn pinned_prefix(activities: &[Activity]) -> usize {
    activities
        .iter()
        .take_while(|a| a.activity_type.is_immutable())
        .count()
}

fn reflow_or_keep(day: NaiveDate, name: SlotName, slot: &mut ActivitySlot) {
    if let Err(e) = reflow_slot(slot) {
        // Recoverable: the slot keeps its previous strings.
        tracing::warn!(day = %day, slot = %name, error = %e, "time reflow aborted");
    }
}

/// Apply an approved move and return the new itinerary.
pub fn apply(itinerary: &Itinerary, mv: &ApprovedMove, ids: &dyn IdGenerator) -> Itinerary {
    let mut next = itinerary.clone();
    match *mv {
        ApprovedMove::Reorder {
            day,
            slot,
            from_index,
            to_index,
        } => reorder(&mut next, day, slot, from_index, to_index),
        ApprovedMove::Transfer { from, to } => transfer(&mut next, from, to, ids),
    }
    next
}

fn reorder(
    itinerary: &mut Itinerary,
    day_key: NaiveDate,
    name: SlotName,
    from_index: usize,
    to_index: usize,
) {
    // Lunch holds a single activity; a same-slot move is a no-op.
    if name == SlotName::Lunch {
        return;
    }
    let Some(slot) = itinerary
        .get_mut(&day_key)
        .and_then(|d| d.sequence_slot_mut(name))
    else {
        return;
    };
    if from_index >= slot.activities.len() {
        return;
    }

    let activity = slot.activities.remove(from_index);
    let pinned = pinned_prefix(&slot.activities);
    let to = to_index.clamp(pinned, slot.activities.len());
    slot.activities.insert(to, activity);

    reflow_or_keep(day_key, name, slot);
    tracing::debug!(day = %day_key, slot = %name, from = from_index, to = to, "activity reordered");
}

fn transfer(itinerary: &mut Itinerary, from: SlotRef, to: SlotRef, ids: &dyn IdGenerator) {
    // Take the activity out of the donor slot and reflow what remains.
    // The validator guarantees the donor is a sequence slot with at least
    // two activities.
    let mut activity = {
        let Some(slot) = itinerary
            .get_mut(&from.day)
            .and_then(|d| d.sequence_slot_mut(from.slot))
        else {
            return;
        };
        if from.index >= slot.activities.len() {
            return;
        }
        let activity = slot.activities.remove(from.index);
        reflow_or_keep(from.day, from.slot, slot);
        activity
    };

    // The activity gets a fresh id scoped to its new slot; the old id is
    // never reused, so ids stay unique across the whole draft.
    activity.id = Some(ids.activity_id());

    let Some(day) = itinerary.get_mut(&to.day) else {
        return;
    };

    if to.slot == SlotName::Lunch {
        let (start, end) = SlotName::Lunch.default_bounds();
        let mut lunch = LunchSlot {
            start_time: start.to_owned(),
            end_time: end.to_owned(),
            activity,
        };
        if let Err(e) = reflow_lunch(&mut lunch) {
            tracing::warn!(day = %to.day, error = %e, "time reflow aborted");
        }
        day.lunch = Some(lunch);
    } else {
        let slot = ensure_sequence_slot(day, to.slot);
        let pinned = pinned_prefix(&slot.activities);
        let index = to.index.clamp(pinned, slot.activities.len());
        slot.activities.insert(index, activity);
        reflow_or_keep(to.day, to.slot, slot);
    }

    tracing::debug!(
        from_day = %from.day, from_slot = %from.slot,
        to_day = %to.day, to_slot = %to.slot,
        "activity transferred"
    );
}

/// Borrow the named sequence slot, creating it with default bounds if the
/// day did not have it.
fn ensure_sequence_slot(day: &mut Day, name: SlotName) -> &mut ActivitySlot {
    let field = match name {
        SlotName::Morning => &mut day.morning,
        SlotName::Afternoon => &mut day.afternoon,
        SlotName::Evening => &mut day.evening,
        SlotName::Lunch => unreachable!("lunch is not a sequence slot"),
    };
    field.get_or_insert_with(|| {
        let (start, end) = name.default_bounds();
        ActivitySlot {
            start_time: start.to_owned(),
            end_time: end.to_owned(),
            activities: Vec::new(),
        }
    })
}

/// Insert a new activity and return the new itinerary.
///
/// Creates the slot with default bounds when it is absent. `index` is
/// clamped past any pinned prefix; `None` appends.
pub fn add_activity(
    itinerary: &Itinerary,
    day_key: NaiveDate,
    name: SlotName,
    index: Option<usize>,
    mut activity: Activity,
    ids: &dyn IdGenerator,
) -> Result<Itinerary, MoveError> {
    let mut next = itinerary.clone();
    let day = next
        .get_mut(&day_key)
        .ok_or(MoveError::NoSuchDay(day_key))?;

    activity.id = Some(ids.activity_id());

    if name == SlotName::Lunch {
        if day.lunch.is_some() {
            return Err(MoveError::LunchOccupied(day_key));
        }
        let (start, end) = SlotName::Lunch.default_bounds();
        let mut lunch = LunchSlot {
            start_time: start.to_owned(),
            end_time: end.to_owned(),
            activity,
        };
        if let Err(e) = reflow_lunch(&mut lunch) {
            tracing::warn!(day = %day_key, error = %e, "time reflow aborted");
        }
        day.lunch = Some(lunch);
    } else {
        let slot = ensure_sequence_slot(day, name);
        let pinned = pinned_prefix(&slot.activities);
        let at = index
            .unwrap_or(slot.activities.len())
            .clamp(pinned, slot.activities.len());
        slot.activities.insert(at, activity);
        reflow_or_keep(day_key, name, slot);
    }

    Ok(next)
}

/// Remove an activity and return the new itinerary.
///
/// Check-in/out activities are not removable. Removing a slot's last
/// activity removes the slot itself -- a present-but-empty slot is never
/// produced. The day may end up with no activities at all; that state is
/// caught by save-time validation, not here.
pub fn remove_activity(
    itinerary: &Itinerary,
    at: &SlotRef,
) -> Result<Itinerary, MoveError> {
    let removed = crate::moves::resolve(itinerary, at)?;
    if removed.activity_type.is_immutable() {
        return Err(MoveError::ImmutableActivity {
            place: removed.place_name.clone(),
            kind: removed.activity_type,
        });
    }

    let mut next = itinerary.clone();
    let day = next.get_mut(&at.day).ok_or(MoveError::NoSuchDay(at.day))?;

    if at.slot == SlotName::Lunch {
        day.lunch = None;
    } else if let Some(slot) = day.sequence_slot_mut(at.slot) {
        slot.activities.remove(at.index);
        if slot.activities.is_empty() {
            match at.slot {
                SlotName::Morning => day.morning = None,
                SlotName::Afternoon => day.afternoon = None,
                SlotName::Evening => day.evening = None,
                SlotName::Lunch => {}
            }
        } else {
            reflow_or_keep(at.day, at.slot, slot);
        }
    }

    tracing::debug!(day = %at.day, slot = %at.slot, index = at.index, "activity removed");
    Ok(next)
}

/// Remove a whole day and return the new itinerary.
///
/// The caller re-runs the hotel synchronizer afterwards, since the
/// first/last day may have changed.
pub fn remove_day(itinerary: &Itinerary, day_key: NaiveDate) -> Result<Itinerary, MoveError> {
    if !itinerary.contains_key(&day_key) {
        return Err(MoveError::NoSuchDay(day_key));
    }
    let mut next = itinerary.clone();
    next.remove(&day_key);
    tracing::debug!(day = %day_key, remaining = next.len(), "day removed");
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    use wayfare_test_utils::SeqIds;
    use wayfare_test_utils::fixtures;

    use crate::moves::{MoveRequest, validate};

    fn at(day_offset: u64, slot: SlotName, index: usize) -> SlotRef {
        SlotRef {
            day: fixtures::first_day() + chrono::Days::new(day_offset),
            slot,
            index,
        }
    }

    #[test]
    fn reorder_reflows_the_slot_in_the_new_order() {
        let itinerary = fixtures::itinerary_with_days(3);
        let day = fixtures::first_day() + chrono::Days::new(1);
        let approved = validate(
            &itinerary,
            &MoveRequest {
                from: at(1, SlotName::Morning, 0),
                to: at(1, SlotName::Morning, 1),
            },
        )
        .unwrap();

        let next = apply(&itinerary, &approved, &SeqIds::new());
        let morning = next[&day].morning.as_ref().unwrap();
        assert_eq!(morning.activities[0].place_name, "Nakamise Street");
        assert_eq!(morning.activities[1].place_name, "Senso-ji Temple");
        assert_eq!(morning.activities[0].time_slot, "8:00 AM - 10:00 AM");
        assert_eq!(morning.activities[1].time_slot, "10:00 AM - 12:00 PM");
        // The input itinerary is untouched.
        assert_eq!(
            itinerary[&day].morning.as_ref().unwrap().activities[0].place_name,
            "Senso-ji Temple"
        );
    }

    #[test]
    fn transfer_reflows_donor_and_target_and_mints_a_new_id() {
        let itinerary = fixtures::itinerary_with_days(3);
        let day2 = fixtures::first_day() + chrono::Days::new(1);
        let day3 = fixtures::first_day() + chrono::Days::new(2);
        let approved = validate(
            &itinerary,
            &MoveRequest {
                from: at(1, SlotName::Morning, 1),
                to: at(2, SlotName::Afternoon, 0),
            },
        )
        .unwrap();

        let next = apply(&itinerary, &approved, &SeqIds::new());

        // Donor slot reflowed over the single remaining activity.
        let donor = next[&day2].morning.as_ref().unwrap();
        assert_eq!(donor.activities.len(), 1);
        assert_eq!(donor.activities[0].time_slot, "8:00 AM - 12:00 PM");
        assert_eq!(donor.activities[0].duration, "4 hours");

        // Target slot was absent: created with default bounds, activity
        // spans it, id freshly minted.
        let target = next[&day3].afternoon.as_ref().unwrap();
        assert_eq!(target.start_time, "2:00 PM");
        assert_eq!(target.end_time, "6:00 PM");
        assert_eq!(target.activities.len(), 1);
        assert_eq!(target.activities[0].place_name, "Nakamise Street");
        assert_eq!(target.activities[0].time_slot, "2:00 PM - 6:00 PM");
        assert_eq!(target.activities[0].id.as_deref(), Some("act-1"));
    }

    #[test]
    fn adding_a_second_activity_splits_the_morning() {
        // Slot 8:00 AM - 12:00 PM with one activity; adding a second at
        // the end gives 8-10 and 10-12.
        let mut itinerary = fixtures::itinerary_with_days(3);
        let day = fixtures::first_day() + chrono::Days::new(1);
        itinerary.get_mut(&day).unwrap().morning.as_mut().unwrap().activities.pop();

        let next = add_activity(
            &itinerary,
            day,
            SlotName::Morning,
            None,
            fixtures::activity("x", "Ueno Park", "", ""),
            &SeqIds::new(),
        )
        .unwrap();

        let morning = next[&day].morning.as_ref().unwrap();
        assert_eq!(morning.activities.len(), 2);
        assert_eq!(morning.activities[0].time_slot, "8:00 AM - 10:00 AM");
        assert_eq!(morning.activities[1].time_slot, "10:00 AM - 12:00 PM");
    }

    #[test]
    fn insertion_clamps_past_the_pinned_checkin() {
        let itinerary = fixtures::itinerary_with_days(3);
        let day1 = fixtures::first_day();

        // Ask for index 0 of the first day's afternoon; the check-in is
        // pinned there, so the insert lands at index 1.
        let next = add_activity(
            &itinerary,
            day1,
            SlotName::Afternoon,
            Some(0),
            fixtures::activity("x", "Golden Gai", "", ""),
            &SeqIds::new(),
        )
        .unwrap();

        let afternoon = next[&day1].afternoon.as_ref().unwrap();
        assert_eq!(
            afternoon.activities[0].activity_type,
            wayfare_store::models::ActivityType::HotelCheckin
        );
        assert_eq!(afternoon.activities[1].place_name, "Golden Gai");
    }

    #[test]
    fn adding_lunch_to_a_day_without_one_creates_the_slot() {
        let itinerary = fixtures::itinerary_with_days(3);
        let day1 = fixtures::first_day();
        assert!(itinerary[&day1].lunch.is_none());

        let next = add_activity(
            &itinerary,
            day1,
            SlotName::Lunch,
            None,
            fixtures::activity("x", "Omoide Yokocho", "", ""),
            &SeqIds::new(),
        )
        .unwrap();

        let lunch = next[&day1].lunch.as_ref().unwrap();
        assert_eq!(lunch.start_time, "12:00 PM");
        assert_eq!(lunch.activity.time_slot, "12:00 PM - 2:00 PM");
    }

    #[test]
    fn adding_a_second_lunch_is_rejected() {
        let itinerary = fixtures::itinerary_with_days(3);
        let day2 = fixtures::first_day() + chrono::Days::new(1);
        let err = add_activity(
            &itinerary,
            day2,
            SlotName::Lunch,
            None,
            fixtures::activity("x", "Omoide Yokocho", "", ""),
            &SeqIds::new(),
        )
        .unwrap_err();
        assert!(matches!(err, MoveError::LunchOccupied(_)));
    }

    #[test]
    fn removing_the_last_activity_removes_the_slot() {
        let itinerary = fixtures::itinerary_with_days(3);
        let day2 = fixtures::first_day() + chrono::Days::new(1);

        let next = remove_activity(&itinerary, &at(1, SlotName::Evening, 0)).unwrap();
        assert!(next[&day2].evening.is_none());
        // Absent, not present-and-empty.
        assert!(
            serde_json::to_string(&next[&day2])
                .unwrap()
                .find("Evening")
                .is_none()
        );
    }

    #[test]
    fn removing_a_checkout_is_rejected() {
        let itinerary = fixtures::itinerary_with_days(3);
        let err = remove_activity(&itinerary, &at(2, SlotName::Morning, 0)).unwrap_err();
        assert!(matches!(err, MoveError::ImmutableActivity { .. }));
    }

    #[test]
    fn removing_lunch_clears_the_slot() {
        let itinerary = fixtures::itinerary_with_days(3);
        let day2 = fixtures::first_day() + chrono::Days::new(1);
        let next = remove_activity(&itinerary, &at(1, SlotName::Lunch, 0)).unwrap();
        assert!(next[&day2].lunch.is_none());
    }

    #[test]
    fn remove_day_drops_the_key() {
        let itinerary = fixtures::itinerary_with_days(3);
        let day2 = fixtures::first_day() + chrono::Days::new(1);
        let next = remove_day(&itinerary, day2).unwrap();
        assert_eq!(next.len(), 2);
        assert!(!next.contains_key(&day2));

        assert!(matches!(
            remove_day(&next, day2),
            Err(MoveError::NoSuchDay(_))
        ));
    }
}

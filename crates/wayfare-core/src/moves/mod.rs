//! Move validation.
//!
//! A proposed move is judged in one shot, before anything is mutated:
//!
//! ```text
//! hotel check-in/out activity      -> ImmutableActivity
//! same day + slot                  -> Reorder (always legal)
//! source slot holds one activity   -> SlotWouldBeEmpty
//! target Lunch already occupied    -> LunchOccupied
//! otherwise                        -> Transfer
//! ```
//!
//! Validation is fully separated from mutation: the reducer only ever
//! receives an [`ApprovedMove`], and a rejected move leaves the itinerary
//! untouched.

use chrono::NaiveDate;
use thiserror::Error;

use wayfare_store::models::{Activity, ActivityType, Itinerary, SlotName};

/// A position within the itinerary: day, slot, index within the slot.
/// For Lunch the index is always 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRef {
    pub day: NaiveDate,
    pub slot: SlotName,
    pub index: usize,
}

/// A proposed user move: relocate the activity at `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub from: SlotRef,
    pub to: SlotRef,
}

/// A move that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovedMove {
    /// Reposition within one slot's ordered sequence.
    Reorder {
        day: NaiveDate,
        slot: SlotName,
        from_index: usize,
        to_index: usize,
    },
    /// Relocate across slots or days.
    Transfer { from: SlotRef, to: SlotRef },
}

/// Errors rejecting a proposed edit. Every rejection leaves the itinerary
/// byte-for-byte unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("itinerary has no day {0}")]
    NoSuchDay(NaiveDate),

    #[error("day {day} has no {slot} slot")]
    NoSuchSlot { day: NaiveDate, slot: SlotName },

    #[error("index {index} is out of bounds for the {slot} slot on {day}")]
    IndexOutOfRange {
        day: NaiveDate,
        slot: SlotName,
        index: usize,
    },

    #[error("{place} is a {kind} activity and cannot be moved or removed")]
    ImmutableActivity { place: String, kind: ActivityType },

    #[error("moving the last activity out would empty the {slot} slot on {day}")]
    SlotWouldBeEmpty { day: NaiveDate, slot: SlotName },

    #[error("the lunch slot on {0} already holds an activity")]
    LunchOccupied(NaiveDate),
}

/// Look up the activity a [`SlotRef`] points at.
pub fn resolve<'a>(itinerary: &'a Itinerary, at: &SlotRef) -> Result<&'a Activity, MoveError> {
    let day = itinerary.get(&at.day).ok_or(MoveError::NoSuchDay(at.day))?;

    if at.slot == SlotName::Lunch {
        let lunch = day.lunch.as_ref().ok_or(MoveError::NoSuchSlot {
            day: at.day,
            slot: at.slot,
        })?;
        if at.index != 0 {
            return Err(MoveError::IndexOutOfRange {
                day: at.day,
                slot: at.slot,
                index: at.index,
            });
        }
        return Ok(&lunch.activity);
    }

    let slot = day.sequence_slot(at.slot).ok_or(MoveError::NoSuchSlot {
        day: at.day,
        slot: at.slot,
    })?;
    slot.activities
        .get(at.index)
        .ok_or(MoveError::IndexOutOfRange {
            day: at.day,
            slot: at.slot,
            index: at.index,
        })
}

/// Decide whether a proposed move is legal.
pub fn validate(itinerary: &Itinerary, request: &MoveRequest) -> Result<ApprovedMove, MoveError> {
    let activity = resolve(itinerary, &request.from)?;

    if activity.activity_type.is_immutable() {
        return Err(MoveError::ImmutableActivity {
            place: activity.place_name.clone(),
            kind: activity.activity_type,
        });
    }

    // A reorder within one slot never empties it.
    if request.from.day == request.to.day && request.from.slot == request.to.slot {
        return Ok(ApprovedMove::Reorder {
            day: request.from.day,
            slot: request.from.slot,
            from_index: request.from.index,
            to_index: request.to.index,
        });
    }

    // Cross-slot or cross-day: the donor slot must keep at least one
    // activity. Lunch holds exactly one, so its activity can never leave.
    let source_day = itinerary
        .get(&request.from.day)
        .ok_or(MoveError::NoSuchDay(request.from.day))?;
    let source_len = match request.from.slot {
        SlotName::Lunch => 1,
        name => source_day
            .sequence_slot(name)
            .map(|s| s.activities.len())
            .unwrap_or(0),
    };
    if source_len <= 1 {
        return Err(MoveError::SlotWouldBeEmpty {
            day: request.from.day,
            slot: request.from.slot,
        });
    }

    let target_day = itinerary
        .get(&request.to.day)
        .ok_or(MoveError::NoSuchDay(request.to.day))?;
    if request.to.slot == SlotName::Lunch && target_day.lunch.is_some() {
        return Err(MoveError::LunchOccupied(request.to.day));
    }

    Ok(ApprovedMove::Transfer {
        from: request.from,
        to: request.to,
    })
}

//! `wayfare move` / `add` / `remove` / `remove-day`: structural edits.
//!
//! Thin adapters: every rule lives in the editing core; these handlers
//! parse arguments, run one session entry point, and report.

use anyhow::Result;

use wayfare_core::moves::MoveRequest;
use wayfare_store::models::Activity;

use crate::config::WayfareConfig;
use crate::resolve::{open_session, parse_day, parse_slot, slot_ref};

/// Move an activity to a new slot/day/position.
#[allow(clippy::too_many_arguments)]
pub fn run_move(
    config: &WayfareConfig,
    trip_id: &str,
    from_day: &str,
    from_slot: &str,
    from_index: usize,
    to_day: &str,
    to_slot: &str,
    to_index: usize,
) -> Result<()> {
    let mut session = open_session(config, trip_id)?;
    let request = MoveRequest {
        from: slot_ref(from_day, from_slot, from_index)?,
        to: slot_ref(to_day, to_slot, to_index)?,
    };

    session.move_activity(&request)?;
    println!(
        "Moved {from_day} {from_slot}[{from_index}] -> {to_day} {to_slot}[{to_index}]."
    );
    Ok(())
}

/// Add a new attraction to a slot.
pub fn run_add(
    config: &WayfareConfig,
    trip_id: &str,
    day: &str,
    slot: &str,
    index: Option<usize>,
    name: &str,
    details: Option<&str>,
) -> Result<()> {
    let mut session = open_session(config, trip_id)?;

    let activity = Activity {
        id: None,
        activity_type: Default::default(),
        place_name: name.to_owned(),
        place_details: details.unwrap_or_default().to_owned(),
        image_url: String::new(),
        geo_coordinates: Default::default(),
        ticket_pricing: String::new(),
        time_slot: String::new(),
        duration: String::new(),
        best_time_to_visit: None,
        start_date_time: None,
        end_date_time: None,
    };

    session.add_activity(parse_day(day)?, parse_slot(slot)?, index, activity)?;
    println!("Added {name} to {day} {slot}.");
    Ok(())
}

/// Remove an activity from a slot.
pub fn run_remove(
    config: &WayfareConfig,
    trip_id: &str,
    day: &str,
    slot: &str,
    index: usize,
) -> Result<()> {
    let mut session = open_session(config, trip_id)?;
    session.remove_activity(&slot_ref(day, slot, index)?)?;
    println!("Removed {day} {slot}[{index}].");
    Ok(())
}

/// Remove a whole day from the itinerary.
pub fn run_remove_day(config: &WayfareConfig, trip_id: &str, day: &str) -> Result<()> {
    let mut session = open_session(config, trip_id)?;
    session.remove_day(parse_day(day)?)?;
    println!(
        "Removed {day}; {} days remain.",
        session.trip().trip_data.itinerary.len()
    );
    Ok(())
}

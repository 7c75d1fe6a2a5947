//! `wayfare import` / `show` / `discard`: draft lifecycle commands.

use std::path::Path;

use anyhow::{Context, Result};

use wayfare_store::draft::DraftStore;
use wayfare_store::ids::{IdGenerator, UuidIds};
use wayfare_store::models::{ActivitySlot, SlotName, Trip};

use crate::config::WayfareConfig;
use crate::resolve::open_session;

/// Read a trip JSON document into the draft cache and print its draft id.
pub fn run_import(config: &WayfareConfig, file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read trip file {}", file.display()))?;
    let mut trip: Trip = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a valid trip document", file.display()))?;

    if trip.id.is_none() {
        trip.id = Some(UuidIds.temp_trip_id());
    }
    let trip_id = trip.id.clone().unwrap_or_default();

    let mut drafts = DraftStore::new(&config.store);
    drafts.save(&trip_id, &trip)?;

    println!("Draft created: {trip_id}");
    println!(
        "  {} | {} days | {} hotels",
        trip.trip_data.location,
        trip.trip_data.itinerary.len(),
        trip.trip_data.hotels.len()
    );
    println!("Next: `wayfare show {trip_id}`");
    Ok(())
}

/// Print the draft itinerary day by day.
pub fn run_show(config: &WayfareConfig, trip_id: &str) -> Result<()> {
    let session = open_session(config, trip_id)?;
    let trip = session.trip();

    println!("Trip: {} ({trip_id})", trip.trip_data.location);
    println!(
        "Dates: {} to {}",
        trip.user_selection.start_date, trip.user_selection.end_date
    );
    println!();

    for (day, details) in &trip.trip_data.itinerary {
        println!("{day}  {}", details.theme);
        print_sequence(details.sequence_slot(SlotName::Morning), "Morning");
        if let Some(lunch) = &details.lunch {
            println!(
                "  Lunch    {} - {}",
                lunch.start_time, lunch.end_time
            );
            println!(
                "    [0] {} ({})",
                lunch.activity.place_name, lunch.activity.time_slot
            );
        }
        print_sequence(details.sequence_slot(SlotName::Afternoon), "Afternoon");
        print_sequence(details.sequence_slot(SlotName::Evening), "Evening");
        println!();
    }

    Ok(())
}

fn print_sequence(slot: Option<&ActivitySlot>, label: &str) {
    let Some(slot) = slot else {
        return;
    };
    println!("  {label:9}{} - {}", slot.start_time, slot.end_time);
    for (i, activity) in slot.activities.iter().enumerate() {
        let marker = match activity.activity_type {
            t if t.is_immutable() => " [pinned]",
            _ => "",
        };
        println!(
            "    [{i}] {} ({}){marker}",
            activity.place_name, activity.time_slot
        );
    }
}

/// Delete the draft for a trip id.
pub fn run_discard(config: &WayfareConfig, trip_id: &str) -> Result<()> {
    let session = open_session(config, trip_id)?;
    session.discard()?;
    println!("Draft {trip_id} discarded.");
    Ok(())
}

//! `wayfare hotel list` / `select` / `add`: hotel options and selection.

use std::path::Path;

use anyhow::{Context, Result, bail};

use wayfare_store::normalize::normalize_hotel;

use crate::config::WayfareConfig;
use crate::resolve::open_session;

/// List the trip's hotel options.
pub fn run_list(config: &WayfareConfig, trip_id: &str) -> Result<()> {
    let session = open_session(config, trip_id)?;
    let hotels = &session.trip().trip_data.hotels;

    if hotels.is_empty() {
        println!("Trip {trip_id} has no hotel options.");
        return Ok(());
    }

    println!("Hotels for trip {trip_id}:");
    for (i, hotel) in hotels.iter().enumerate() {
        let rating = hotel
            .rating
            .map(|r| format!(" {r:.1}*"))
            .unwrap_or_default();
        let price = hotel
            .price
            .as_deref()
            .map(|p| format!(" {p}/night"))
            .unwrap_or_default();
        println!("  [{i}] {}{rating}{price}", hotel.hotel_name);
        if !hotel.hotel_address.is_empty() {
            println!("      {}", hotel.hotel_address);
        }
    }
    Ok(())
}

/// Select a hotel by index and rebind the check-in/out activities to it.
pub fn run_select(config: &WayfareConfig, trip_id: &str, index: usize) -> Result<()> {
    let mut session = open_session(config, trip_id)?;

    let hotels = &session.trip().trip_data.hotels;
    let Some(hotel) = hotels.get(index).cloned() else {
        bail!(
            "hotel index {index} is out of range ({} options; see `wayfare hotel list`)",
            hotels.len()
        );
    };

    session.select_hotel(hotel.clone())?;
    println!("Selected {}; check-in and check-out updated.", hotel.hotel_name);
    Ok(())
}

/// Normalize a raw provider hotel payload and add it to the trip's
/// options. Payloads describing an already-listed hotel refresh that
/// record instead of duplicating it.
pub fn run_add(config: &WayfareConfig, trip_id: &str, file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read hotel file {}", file.display()))?;
    let raw: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", file.display()))?;
    let hotel = normalize_hotel(&raw)
        .with_context(|| format!("{} is not a recognized hotel payload", file.display()))?;

    let mut session = open_session(config, trip_id)?;
    let name = hotel.hotel_name.clone();
    let source = hotel.source;
    let refreshed = session.add_hotel_option(hotel)?;

    if refreshed {
        println!("Refreshed {name} (from {source} payload).");
    } else {
        println!("Added {name} (from {source} payload).");
    }
    Ok(())
}

//! `wayfare save`: reconcile a draft against the trip store.

use anyhow::{Result, bail};

use wayfare_store::trips::FileTripStore;

use crate::config::WayfareConfig;
use crate::resolve::open_session;

/// Validate the draft, select the hotel, and submit to the trip store.
/// On success the draft is cleared and the permanent id printed.
pub async fn run_save(
    config: &WayfareConfig,
    trip_id: &str,
    hotel_index: usize,
) -> Result<()> {
    let email = config.require_email()?;
    let mut session = open_session(config, trip_id)?;

    let hotels = &session.trip().trip_data.hotels;
    let Some(hotel) = hotels.get(hotel_index).cloned() else {
        bail!(
            "hotel index {hotel_index} is out of range ({} options; see `wayfare hotel list`)",
            hotels.len()
        );
    };
    session.select_hotel(hotel)?;

    let store = FileTripStore::new(&config.store);
    let permanent_id = session.save(email, &store).await?;

    println!("Trip saved: {permanent_id}");
    if permanent_id != trip_id {
        println!("  (draft {trip_id} promoted and cleared)");
    }
    Ok(())
}

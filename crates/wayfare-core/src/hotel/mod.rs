//! Hotel synchronization.
//!
//! The first day's Afternoon check-in activity and the last day's Morning
//! check-out activity stay bound to the currently selected hotel. The
//! synchronizer runs whenever the hotel selection changes and whenever
//! the itinerary's day-key set changes (the first/last day may have
//! moved).

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use wayfare_store::models::{Activity, ActivityType, Hotel, Itinerary};

/// Bind the selected hotel into the check-in/out activities and return
/// the new itinerary.
///
/// Rewrites only the binding fields (name, details, image, coordinates);
/// every other activity is untouched. A missing check-in or check-out is
/// a no-op -- the data model normally guarantees their presence, but the
/// synchronizer does not insist on it. Idempotent: syncing the same hotel
/// twice equals syncing it once.
pub fn sync(itinerary: &Itinerary, hotel: &Hotel) -> Itinerary {
    let mut next = itinerary.clone();

    if let Some((&key, day)) = next.iter_mut().next() {
        let checkin = day
            .afternoon
            .as_mut()
            .and_then(|s| find_of_type(&mut s.activities, ActivityType::HotelCheckin));
        match checkin {
            Some(activity) => {
                bind(activity, hotel, &format!("Check-in at {}", hotel.hotel_name));
                tracing::debug!(day = %key, hotel = %hotel.hotel_name, "check-in rebound");
            }
            None => {
                tracing::debug!(day = %key, "no check-in activity to rebind");
            }
        }
    }

    if let Some((&key, day)) = next.iter_mut().next_back() {
        let checkout = day
            .morning
            .as_mut()
            .and_then(|s| find_of_type(&mut s.activities, ActivityType::HotelCheckout));
        match checkout {
            Some(activity) => {
                bind(
                    activity,
                    hotel,
                    &format!("Check-out from {}", hotel.hotel_name),
                );
                tracing::debug!(day = %key, hotel = %hotel.hotel_name, "check-out rebound");
            }
            None => {
                tracing::debug!(day = %key, "no check-out activity to rebind");
            }
        }
    }

    next
}

fn find_of_type(activities: &mut [Activity], ty: ActivityType) -> Option<&mut Activity> {
    activities.iter_mut().find(|a| a.activity_type == ty)
}

fn bind(activity: &mut Activity, hotel: &Hotel, details: &str) {
    activity.place_name = hotel.hotel_name.clone();
    activity.place_details = details.to_owned();
    activity.image_url = hotel.hotel_image_url.clone();
    activity.geo_coordinates = hotel.geo_coordinates;
}

// ---------------------------------------------------------------------------
// Identity matching
// ---------------------------------------------------------------------------

/// Decide whether two hotel records describe the same entity.
///
/// Providers disagree on shapes and spellings, so matching runs in
/// priority order: a shared provider property token decides when both
/// records carry one; otherwise normalized name plus address decide when
/// both records carry an address; otherwise normalized name alone.
pub fn same_hotel(a: &Hotel, b: &Hotel) -> bool {
    if let (Some(ta), Some(tb)) = (nonempty(a.property_token.as_deref()), nonempty(b.property_token.as_deref())) {
        return ta == tb;
    }

    let name_a = normalize_text(&a.hotel_name);
    let name_b = normalize_text(&b.hotel_name);
    if name_a.is_empty() || name_b.is_empty() {
        return false;
    }

    let addr_a = normalize_text(&a.hotel_address);
    let addr_b = normalize_text(&b.hotel_address);
    if !addr_a.is_empty() && !addr_b.is_empty() {
        return name_a == name_b && addr_a == addr_b;
    }

    name_a == name_b
}

fn nonempty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// Normalization used for identity matching: lowercase, trimmed,
/// whitespace-collapsed, diacritics stripped (NFKD minus combining
/// marks).
pub fn normalize_text(s: &str) -> String {
    let stripped: String = s.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    stripped
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    use wayfare_test_utils::fixtures;

    #[test]
    fn sync_rebinds_first_checkin_and_last_checkout() {
        let itinerary = fixtures::itinerary_with_days(3);
        let hotel = fixtures::hotel("Park Hyatt Tokyo");

        let next = sync(&itinerary, &hotel);

        let first = fixtures::first_day();
        let last = first + chrono::Days::new(2);
        let checkin = &next[&first].afternoon.as_ref().unwrap().activities[0];
        assert_eq!(checkin.place_name, "Park Hyatt Tokyo");
        assert_eq!(checkin.place_details, "Check-in at Park Hyatt Tokyo");
        let checkout = &next[&last].morning.as_ref().unwrap().activities[0];
        assert_eq!(checkout.place_details, "Check-out from Park Hyatt Tokyo");
    }

    #[test]
    fn sync_leaves_every_other_activity_identical() {
        let itinerary = fixtures::itinerary_with_days(3);
        let next = sync(&itinerary, &fixtures::hotel("Park Hyatt Tokyo"));

        let first = fixtures::first_day();
        let day2 = first + chrono::Days::new(1);
        let last = first + chrono::Days::new(2);

        // Non-hotel activities in the touched slots.
        assert_eq!(
            next[&first].afternoon.as_ref().unwrap().activities[1],
            itinerary[&first].afternoon.as_ref().unwrap().activities[1]
        );
        assert_eq!(
            next[&last].morning.as_ref().unwrap().activities[1],
            itinerary[&last].morning.as_ref().unwrap().activities[1]
        );
        // Untouched days are byte-identical.
        assert_eq!(next[&day2], itinerary[&day2]);
    }

    #[test]
    fn sync_is_idempotent() {
        let itinerary = fixtures::itinerary_with_days(3);
        let hotel = fixtures::hotel("Park Hyatt Tokyo");
        let once = sync(&itinerary, &hotel);
        let twice = sync(&once, &hotel);
        assert_eq!(once, twice);
    }

    #[test]
    fn sync_without_checkin_is_a_no_op() {
        let mut itinerary = fixtures::itinerary_with_days(3);
        let first = fixtures::first_day();
        itinerary.get_mut(&first).unwrap().afternoon = None;

        let next = sync(&itinerary, &fixtures::hotel("Park Hyatt Tokyo"));
        assert_eq!(next[&first], itinerary[&first]);
    }

    #[test]
    fn property_token_decides_when_both_present() {
        let mut a = fixtures::hotel("Hotel A");
        let mut b = fixtures::hotel("Completely Different Name");
        a.property_token = Some("tok_1".to_owned());
        b.property_token = Some("tok_1".to_owned());
        assert!(same_hotel(&a, &b));

        b.property_token = Some("tok_2".to_owned());
        b.hotel_name = a.hotel_name.clone();
        // Same name, different tokens: different entities.
        assert!(!same_hotel(&a, &b));
    }

    #[test]
    fn name_and_address_match_when_tokens_are_missing() {
        let mut a = fixtures::hotel("Hôtel Café Royal");
        let mut b = fixtures::hotel("hotel cafe royal");
        a.property_token = None;
        b.property_token = None;
        assert!(same_hotel(&a, &b));

        b.hotel_address = "Somewhere else entirely".to_owned();
        assert!(!same_hotel(&a, &b));
    }

    #[test]
    fn name_alone_matches_when_an_address_is_missing() {
        let mut a = fixtures::hotel("Gracery  Shinjuku");
        let mut b = fixtures::hotel("gracery shinjuku");
        a.property_token = None;
        b.property_token = None;
        b.hotel_address = String::new();
        assert!(same_hotel(&a, &b));
    }

    #[test]
    fn normalization_strips_diacritics_and_collapses_whitespace() {
        assert_eq!(normalize_text("  Hôtel   Émeraude "), "hotel emeraude");
    }
}

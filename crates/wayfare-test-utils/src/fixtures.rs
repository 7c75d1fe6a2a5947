//! Trip document fixtures.
//!
//! The builders produce a realistic Tokyo itinerary with the structure the
//! scheduler expects: check-in as the first Afternoon activity of the
//! first day, check-out as the first Morning activity of the last day, and
//! `TimeSlot` strings that already satisfy the slot partition rule.

use chrono::NaiveDate;

use wayfare_store::models::{
    Activity, ActivitySlot, ActivityType, Day, GeoCoordinates, Hotel, HotelSource, Itinerary,
    LunchSlot, Trip, TripData, UserSelection,
};

/// The hotel every fixture trip checks into.
pub const FIXTURE_HOTEL: &str = "Hotel Gracery Shinjuku";

/// First day key of every fixture trip.
pub fn first_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, 1).expect("valid fixture date")
}

/// A canonical hotel record.
pub fn hotel(name: &str) -> Hotel {
    Hotel {
        hotel_name: name.to_owned(),
        hotel_address: "1-19-1 Kabukicho, Shinjuku City, Tokyo".to_owned(),
        hotel_image_url: format!("https://example.com/{}.jpg", name.to_lowercase().replace(' ', "-")),
        geo_coordinates: GeoCoordinates {
            latitude: 35.6949,
            longitude: 139.7006,
        },
        price: Some("$180".to_owned()),
        rating: Some(4.2),
        property_token: None,
        source: HotelSource::TripDocument,
    }
}

/// A normal attraction activity with derived fields already populated.
pub fn activity(id: &str, name: &str, time_slot: &str, duration: &str) -> Activity {
    Activity {
        id: Some(id.to_owned()),
        activity_type: ActivityType::NormalAttraction,
        place_name: name.to_owned(),
        place_details: format!("Visit {name}"),
        image_url: format!("https://example.com/{}.jpg", id),
        geo_coordinates: GeoCoordinates {
            latitude: 35.68,
            longitude: 139.76,
        },
        ticket_pricing: "Free".to_owned(),
        time_slot: time_slot.to_owned(),
        duration: duration.to_owned(),
        best_time_to_visit: None,
        start_date_time: None,
        end_date_time: None,
    }
}

/// The check-in activity bound to `hotel_name`.
pub fn checkin(id: &str, hotel_name: &str, time_slot: &str, duration: &str) -> Activity {
    let mut a = activity(id, hotel_name, time_slot, duration);
    a.activity_type = ActivityType::HotelCheckin;
    a.place_details = format!("Check-in at {hotel_name}");
    a
}

/// The check-out activity bound to `hotel_name`.
pub fn checkout(id: &str, hotel_name: &str, time_slot: &str, duration: &str) -> Activity {
    let mut a = activity(id, hotel_name, time_slot, duration);
    a.activity_type = ActivityType::HotelCheckout;
    a.place_details = format!("Check-out from {hotel_name}");
    a
}

fn slot(start: &str, end: &str, activities: Vec<Activity>) -> ActivitySlot {
    ActivitySlot {
        start_time: start.to_owned(),
        end_time: end.to_owned(),
        activities,
    }
}

/// Build an `n`-day itinerary (n >= 1) starting at [`first_day`].
///
/// - First day: Afternoon `[check-in, Meiji Shrine]`, Evening
///   `[Shibuya Crossing]`.
/// - Middle days: Morning `[Senso-ji Temple, Nakamise Street]`, Lunch
///   `[Ichiran Ramen]`, Afternoon `[teamLab Planets]`, Evening
///   `[Tokyo Skytree]`.
/// - Last day (when n > 1): Morning `[check-out, Tsukiji Outer Market]`.
pub fn itinerary_with_days(n: usize) -> Itinerary {
    assert!(n >= 1, "a trip has at least one day");
    let mut itinerary = Itinerary::new();

    for i in 0..n {
        let key = first_day() + chrono::Days::new(i as u64);
        let d = i + 1;
        let mut day = Day {
            theme: format!("Day {d}"),
            ..Day::default()
        };

        if i == 0 {
            day.theme = "Arrival and Shinjuku".to_owned();
            day.afternoon = Some(slot(
                "2:00 PM",
                "6:00 PM",
                vec![
                    checkin(
                        &format!("d{d}-pm-0"),
                        FIXTURE_HOTEL,
                        "2:00 PM - 4:00 PM",
                        "2 hours",
                    ),
                    activity(
                        &format!("d{d}-pm-1"),
                        "Meiji Shrine",
                        "4:00 PM - 6:00 PM",
                        "2 hours",
                    ),
                ],
            ));
            day.evening = Some(slot(
                "6:00 PM",
                "10:00 PM",
                vec![activity(
                    &format!("d{d}-ev-0"),
                    "Shibuya Crossing",
                    "6:00 PM - 10:00 PM",
                    "4 hours",
                )],
            ));
        } else if i == n - 1 {
            day.theme = "Departure".to_owned();
            day.morning = Some(slot(
                "8:00 AM",
                "12:00 PM",
                vec![
                    checkout(
                        &format!("d{d}-am-0"),
                        FIXTURE_HOTEL,
                        "8:00 AM - 10:00 AM",
                        "2 hours",
                    ),
                    activity(
                        &format!("d{d}-am-1"),
                        "Tsukiji Outer Market",
                        "10:00 AM - 12:00 PM",
                        "2 hours",
                    ),
                ],
            ));
        } else {
            day.morning = Some(slot(
                "8:00 AM",
                "12:00 PM",
                vec![
                    activity(
                        &format!("d{d}-am-0"),
                        "Senso-ji Temple",
                        "8:00 AM - 10:00 AM",
                        "2 hours",
                    ),
                    activity(
                        &format!("d{d}-am-1"),
                        "Nakamise Street",
                        "10:00 AM - 12:00 PM",
                        "2 hours",
                    ),
                ],
            ));
            day.lunch = Some(LunchSlot {
                start_time: "12:00 PM".to_owned(),
                end_time: "2:00 PM".to_owned(),
                activity: activity(
                    &format!("d{d}-ln-0"),
                    "Ichiran Ramen",
                    "12:00 PM - 2:00 PM",
                    "2 hours",
                ),
            });
            day.afternoon = Some(slot(
                "2:00 PM",
                "6:00 PM",
                vec![activity(
                    &format!("d{d}-pm-0"),
                    "teamLab Planets",
                    "2:00 PM - 6:00 PM",
                    "4 hours",
                )],
            ));
            day.evening = Some(slot(
                "6:00 PM",
                "10:00 PM",
                vec![activity(
                    &format!("d{d}-ev-0"),
                    "Tokyo Skytree",
                    "6:00 PM - 10:00 PM",
                    "4 hours",
                )],
            ));
        }

        itinerary.insert(key, day);
    }

    itinerary
}

/// Build a full `n`-day trip document around [`itinerary_with_days`].
pub fn trip_with_days(n: usize) -> Trip {
    let start = first_day();
    let end = start + chrono::Days::new((n - 1) as u64);
    Trip {
        id: None,
        user_selection: UserSelection {
            location: "Tokyo, Japan".to_owned(),
            start_date: start,
            end_date: end,
            budget: "Moderate".to_owned(),
            travelers: "A Couple".to_owned(),
        },
        trip_data: TripData {
            location: "Tokyo, Japan".to_owned(),
            duration: format!("{n} Days"),
            budget: "Moderate".to_owned(),
            travelers: "A Couple".to_owned(),
            total_travelers: 2,
            timezone: "Asia/Tokyo".to_owned(),
            hotels: vec![hotel(FIXTURE_HOTEL), hotel("Park Hyatt Tokyo")],
            itinerary: itinerary_with_days(n),
        },
    }
}

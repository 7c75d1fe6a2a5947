//! Trip document types.
//!
//! These types are the serde shape of the trip JSON document exchanged with
//! the external trip store and cached by the draft store. Field renames
//! match the wire names exactly; editing logic in `wayfare-core` operates
//! on these types directly.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Kind of a scheduled activity.
///
/// Check-in and check-out activities are bound to the selected hotel and are
/// immutable in position: they cannot be moved, reordered, or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    HotelCheckin,
    HotelCheckout,
    NormalAttraction,
}

impl ActivityType {
    /// Whether this activity is pinned in place (hotel check-in/out).
    pub fn is_immutable(self) -> bool {
        matches!(self, Self::HotelCheckin | Self::HotelCheckout)
    }
}

impl Default for ActivityType {
    fn default() -> Self {
        Self::NormalAttraction
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::HotelCheckin => "hotel_checkin",
            Self::HotelCheckout => "hotel_checkout",
            Self::NormalAttraction => "normal_attraction",
        };
        f.write_str(s)
    }
}

impl FromStr for ActivityType {
    type Err = ActivityTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hotel_checkin" => Ok(Self::HotelCheckin),
            "hotel_checkout" => Ok(Self::HotelCheckout),
            "normal_attraction" => Ok(Self::NormalAttraction),
            other => Err(ActivityTypeParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ActivityType`] string.
#[derive(Debug, Clone)]
pub struct ActivityTypeParseError(pub String);

impl fmt::Display for ActivityTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid activity type: {:?}", self.0)
    }
}

impl std::error::Error for ActivityTypeParseError {}

// ---------------------------------------------------------------------------

/// One of the four fixed daily periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotName {
    Morning,
    Lunch,
    Afternoon,
    Evening,
}

impl SlotName {
    /// Default slot bounds used when a move or add creates a slot that was
    /// previously absent from the day.
    pub fn default_bounds(self) -> (&'static str, &'static str) {
        match self {
            Self::Morning => ("8:00 AM", "12:00 PM"),
            Self::Lunch => ("12:00 PM", "2:00 PM"),
            Self::Afternoon => ("2:00 PM", "6:00 PM"),
            Self::Evening => ("6:00 PM", "10:00 PM"),
        }
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Morning => "morning",
            Self::Lunch => "lunch",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
        };
        f.write_str(s)
    }
}

impl FromStr for SlotName {
    type Err = SlotNameParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(Self::Morning),
            "lunch" => Ok(Self::Lunch),
            "afternoon" => Ok(Self::Afternoon),
            "evening" => Ok(Self::Evening),
            other => Err(SlotNameParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`SlotName`] string.
#[derive(Debug, Clone)]
pub struct SlotNameParseError(pub String);

impl fmt::Display for SlotNameParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid slot name: {:?}", self.0)
    }
}

impl std::error::Error for SlotNameParseError {}

// ---------------------------------------------------------------------------

/// Which provider a normalized hotel record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HotelSource {
    /// Embedded in a trip document (already canonical).
    TripDocument,
    /// A hotel-search provider payload.
    SearchProvider,
    /// A places/geocoding provider payload.
    PlacesProvider,
}

impl Default for HotelSource {
    fn default() -> Self {
        Self::TripDocument
    }
}

impl fmt::Display for HotelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::TripDocument => "trip_document",
            Self::SearchProvider => "search_provider",
            Self::PlacesProvider => "places_provider",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Document structs
// ---------------------------------------------------------------------------

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoCoordinates {
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

/// A normalized hotel record.
///
/// Provider payloads are converted into this shape at the boundary (see
/// [`crate::normalize`]); nothing downstream branches on raw provider
/// fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    #[serde(rename = "HotelName")]
    pub hotel_name: String,
    #[serde(rename = "HotelAddress", default)]
    pub hotel_address: String,
    #[serde(rename = "HotelImageUrl", default)]
    pub hotel_image_url: String,
    #[serde(rename = "GeoCoordinates", default)]
    pub geo_coordinates: GeoCoordinates,
    #[serde(rename = "Price", default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(rename = "Rating", default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Provider-assigned stable identifier, when the provider supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_token: Option<String>,
    #[serde(default)]
    pub source: HotelSource,
}

/// A single scheduled place visit or hotel event within a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Ephemeral editing id, unique within the trip for the lifetime of the
    /// draft. Stripped from the document before it is handed to the trip
    /// store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "ActivityType", default)]
    pub activity_type: ActivityType,
    #[serde(rename = "PlaceName")]
    pub place_name: String,
    #[serde(rename = "PlaceDetails", default)]
    pub place_details: String,
    #[serde(rename = "ImageUrl", default)]
    pub image_url: String,
    #[serde(rename = "GeoCoordinates", default)]
    pub geo_coordinates: GeoCoordinates,
    #[serde(rename = "TicketPricing", default)]
    pub ticket_pricing: String,
    /// Derived human time range, e.g. `"9:00 AM - 12:00 PM"`. Recomputed
    /// after every structural change to the slot; never hand-edited.
    #[serde(rename = "TimeSlot", default)]
    pub time_slot: String,
    /// Derived display duration, e.g. `"3 hours"`.
    #[serde(rename = "Duration", default)]
    pub duration: String,
    #[serde(
        rename = "BestTimeToVisit",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub best_time_to_visit: Option<String>,
    /// Absolute timestamps attached by the schedule stamper when the trip is
    /// persisted. Absent while the draft is being edited.
    #[serde(
        rename = "StartDateTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date_time: Option<DateTime<FixedOffset>>,
    #[serde(
        rename = "EndDateTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date_time: Option<DateTime<FixedOffset>>,
}

/// A slot holding an ordered sequence of activities (Morning, Afternoon,
/// Evening).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySlot {
    /// Fixed slot-level start bound, e.g. `"8:00 AM"`.
    #[serde(rename = "StartTime")]
    pub start_time: String,
    /// Fixed slot-level end bound, e.g. `"12:00 PM"`.
    #[serde(rename = "EndTime")]
    pub end_time: String,
    #[serde(rename = "Activities")]
    pub activities: Vec<Activity>,
}

/// The Lunch slot, which holds exactly one activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LunchSlot {
    #[serde(rename = "StartTime")]
    pub start_time: String,
    #[serde(rename = "EndTime")]
    pub end_time: String,
    #[serde(rename = "Activity")]
    pub activity: Activity,
}

/// One calendar day of the itinerary.
///
/// A slot that is `None` is absent (nothing scheduled for that period); an
/// absent slot is a different state from a present slot with zero
/// activities, which the reducer never produces.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Day {
    #[serde(rename = "Theme", default)]
    pub theme: String,
    #[serde(rename = "Morning", default, skip_serializing_if = "Option::is_none")]
    pub morning: Option<ActivitySlot>,
    #[serde(rename = "Lunch", default, skip_serializing_if = "Option::is_none")]
    pub lunch: Option<LunchSlot>,
    #[serde(
        rename = "Afternoon",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub afternoon: Option<ActivitySlot>,
    #[serde(rename = "Evening", default, skip_serializing_if = "Option::is_none")]
    pub evening: Option<ActivitySlot>,
}

impl Day {
    /// Borrow the sequence slot with the given name. Lunch is not a
    /// sequence slot; callers handle it separately.
    pub fn sequence_slot(&self, name: SlotName) -> Option<&ActivitySlot> {
        match name {
            SlotName::Morning => self.morning.as_ref(),
            SlotName::Afternoon => self.afternoon.as_ref(),
            SlotName::Evening => self.evening.as_ref(),
            SlotName::Lunch => None,
        }
    }

    /// Mutably borrow the sequence slot with the given name.
    pub fn sequence_slot_mut(&mut self, name: SlotName) -> Option<&mut ActivitySlot> {
        match name {
            SlotName::Morning => self.morning.as_mut(),
            SlotName::Afternoon => self.afternoon.as_mut(),
            SlotName::Evening => self.evening.as_mut(),
            SlotName::Lunch => None,
        }
    }

    /// Total activity count across all four slots.
    pub fn total_activities(&self) -> usize {
        let seq = [&self.morning, &self.afternoon, &self.evening]
            .iter()
            .filter_map(|s| s.as_ref().map(|s| s.activities.len()))
            .sum::<usize>();
        seq + usize::from(self.lunch.is_some())
    }

    /// Whether the day has no activities in any slot.
    pub fn is_empty(&self) -> bool {
        self.total_activities() == 0
    }
}

/// The itinerary: day key (calendar date) to day. The map ordering makes
/// the earliest and latest keys the first and last days of the trip.
pub type Itinerary = BTreeMap<NaiveDate, Day>;

/// Trip-wide data produced by generation and edited by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripData {
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Duration", default)]
    pub duration: String,
    #[serde(rename = "Budget", default)]
    pub budget: String,
    #[serde(rename = "Travelers", default)]
    pub travelers: String,
    #[serde(rename = "TotalTravelers", default)]
    pub total_travelers: u32,
    /// IANA timezone name of the destination, e.g. `"Asia/Tokyo"`.
    #[serde(rename = "Timezone", default)]
    pub timezone: String,
    #[serde(rename = "Hotels", default)]
    pub hotels: Vec<Hotel>,
    #[serde(rename = "Itinerary", default)]
    pub itinerary: Itinerary,
}

/// What the user asked for when generating the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSelection {
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub travelers: String,
}

/// The root trip aggregate.
///
/// `id` is `None` before the draft store first touches the trip, a
/// `temp_`-prefixed id while unsaved, and the store-assigned permanent id
/// after the first successful save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "userSelection")]
    pub user_selection: UserSelection,
    #[serde(rename = "tripData")]
    pub trip_data: TripData,
}

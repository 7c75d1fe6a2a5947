//! Boundary normalization of provider hotel payloads.
//!
//! Hotels arrive from different providers under different field names. All
//! of them are converted into the canonical [`Hotel`] record here, tagged
//! with their [`HotelSource`], before any editing logic runs -- nothing
//! downstream ever branches on a raw provider shape.

use serde_json::Value;
use thiserror::Error;

use crate::models::{GeoCoordinates, Hotel, HotelSource};

/// Errors from hotel payload normalization.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("hotel payload is not a JSON object")]
    NotAnObject,

    #[error("unrecognized hotel payload shape (no known name field)")]
    UnknownShape,

    #[error("hotel payload has an empty name")]
    EmptyName,
}

/// Normalize a raw provider payload into a canonical [`Hotel`].
///
/// Recognized shapes, in the order they are tried:
/// - trip-document native: `HotelName` / `HotelAddress` / `HotelImageUrl` /
///   `GeoCoordinates {Latitude, Longitude}` / `property_token`
/// - search provider: `name` / `address` / `images[0].thumbnail` /
///   `gps_coordinates {latitude, longitude}` / `property_token`
/// - places provider: `title` / `formatted_address` / `photo_url` /
///   `location {lat, lng}` / `place_id`
pub fn normalize_hotel(raw: &Value) -> Result<Hotel, NormalizeError> {
    let obj = raw.as_object().ok_or(NormalizeError::NotAnObject)?;

    let (source, name) = if let Some(name) = str_field(raw, "HotelName") {
        (HotelSource::TripDocument, name)
    } else if let Some(name) = str_field(raw, "name") {
        (HotelSource::SearchProvider, name)
    } else if let Some(name) = str_field(raw, "title") {
        (HotelSource::PlacesProvider, name)
    } else {
        return Err(NormalizeError::UnknownShape);
    };

    if name.trim().is_empty() {
        return Err(NormalizeError::EmptyName);
    }

    let hotel = match source {
        HotelSource::TripDocument => Hotel {
            hotel_name: name,
            hotel_address: str_field(raw, "HotelAddress").unwrap_or_default(),
            hotel_image_url: str_field(raw, "HotelImageUrl").unwrap_or_default(),
            geo_coordinates: coords(&raw["GeoCoordinates"], "Latitude", "Longitude"),
            price: str_field(raw, "Price"),
            rating: raw["Rating"].as_f64(),
            property_token: str_field(raw, "property_token"),
            source,
        },
        HotelSource::SearchProvider => Hotel {
            hotel_name: name,
            hotel_address: str_field(raw, "address").unwrap_or_default(),
            hotel_image_url: first_image(raw).unwrap_or_default(),
            geo_coordinates: coords(&raw["gps_coordinates"], "latitude", "longitude"),
            price: str_field(&raw["rate_per_night"], "lowest")
                .or_else(|| str_field(raw, "price")),
            rating: raw["overall_rating"].as_f64().or_else(|| raw["rating"].as_f64()),
            property_token: str_field(raw, "property_token"),
            source,
        },
        HotelSource::PlacesProvider => Hotel {
            hotel_name: name,
            hotel_address: str_field(raw, "formatted_address").unwrap_or_default(),
            hotel_image_url: str_field(raw, "photo_url").unwrap_or_default(),
            geo_coordinates: coords(&raw["location"], "lat", "lng"),
            price: None,
            rating: raw["rating"].as_f64(),
            property_token: str_field(raw, "place_id"),
            source,
        },
    };

    tracing::debug!(
        hotel = %hotel.hotel_name,
        source = %hotel.source,
        fields = obj.len(),
        "normalized hotel payload"
    );
    Ok(hotel)
}

fn str_field(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .filter(|s| !s.is_empty())
}

fn coords(value: &Value, lat_field: &str, lon_field: &str) -> GeoCoordinates {
    GeoCoordinates {
        latitude: value.get(lat_field).and_then(Value::as_f64).unwrap_or(0.0),
        longitude: value.get(lon_field).and_then(Value::as_f64).unwrap_or(0.0),
    }
}

fn first_image(raw: &Value) -> Option<String> {
    let images = raw.get("images")?.as_array()?;
    let first = images.first()?;
    // Either a bare URL string or an object with a thumbnail field.
    first
        .as_str()
        .map(str::to_owned)
        .or_else(|| str_field(first, "thumbnail"))
        .or_else(|| str_field(first, "original_image"))
}

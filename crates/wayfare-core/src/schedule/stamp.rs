//! Schedule stamping: absolute timestamps for the persisted copy.
//!
//! Draft editing operates purely on human time strings; only when a trip
//! is handed to the trip store does each activity's `TimeSlot` get
//! combined with its day key and the trip's IANA timezone into an
//! offset-aware timestamp pair. A failed stamp is non-fatal: the caller
//! logs it and persists the day with its human-readable fields only.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use thiserror::Error;

use crate::timefmt::{self, FormatError};

/// Errors from schedule stamping.
#[derive(Debug, Error)]
pub enum StampError {
    #[error("unknown timezone: {0:?}")]
    UnknownZone(String),

    #[error(transparent)]
    BadTimeSlot(#[from] FormatError),

    #[error("no valid local time for {day} at minute {minute} in {zone}")]
    InvalidLocal {
        day: NaiveDate,
        minute: u32,
        zone: String,
    },
}

/// Combine a day key and a `"<start> - <end>"` time-slot string with an
/// IANA timezone into absolute start/end timestamps.
pub fn stamp(
    day: NaiveDate,
    time_slot: &str,
    tz_name: &str,
) -> Result<(DateTime<FixedOffset>, DateTime<FixedOffset>), StampError> {
    let tz: Tz = tz_name
        .parse()
        .map_err(|_| StampError::UnknownZone(tz_name.to_owned()))?;
    let (start_min, end_min) = timefmt::parse_range(time_slot)?;
    Ok((
        local_timestamp(day, start_min, tz)?,
        local_timestamp(day, end_min, tz)?,
    ))
}

/// Resolve a (date, minute-of-day) pair in a zone. Ambiguous local times
/// (fall-back DST transitions) take the earliest interpretation;
/// nonexistent local times (spring-forward gaps) fail.
fn local_timestamp(
    day: NaiveDate,
    minute: u32,
    tz: Tz,
) -> Result<DateTime<FixedOffset>, StampError> {
    let time = NaiveTime::from_hms_opt(minute / 60, minute % 60, 0).ok_or_else(|| {
        StampError::InvalidLocal {
            day,
            minute,
            zone: tz.name().to_owned(),
        }
    })?;
    tz.from_local_datetime(&day.and_time(time))
        .earliest()
        .map(|dt| dt.fixed_offset())
        .ok_or_else(|| StampError::InvalidLocal {
            day,
            minute,
            zone: tz.name().to_owned(),
        })
}

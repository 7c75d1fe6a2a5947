//! Human time string parsing and formatting.
//!
//! Times are exchanged with the document as 12-hour strings
//! (`"2:00 PM"`, `"8 AM"`) and computed on as minute-of-day integers in
//! `[0, 1440)`. Parsing accepts optional minutes and a case-insensitive
//! meridiem; formatting always prints minutes, so every derived string
//! looks like the slot bounds (`"8:00 AM"`).
//!
//! A [`FormatError`] is recoverable: callers abort the enclosing
//! recomputation and keep the previous strings rather than propagate a
//! corrupt time.

use thiserror::Error;

/// Minutes in a day; all minute-of-day values are below this.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Errors from time string parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("unparsable time string: {0:?}")]
    Unparsable(String),

    #[error("time components out of range in {0:?}")]
    OutOfRange(String),

    #[error("unparsable time range: {0:?} (expected \"<start> - <end>\")")]
    BadRange(String),
}

/// Parse a 12-hour time string (`h[:mm] AM|PM`, meridiem case-insensitive)
/// into minutes of day.
pub fn parse_time(s: &str) -> Result<u32, FormatError> {
    let lower = s.trim().to_ascii_lowercase();
    let (body, is_pm) = if let Some(body) = lower.strip_suffix("am") {
        (body, false)
    } else if let Some(body) = lower.strip_suffix("pm") {
        (body, true)
    } else {
        return Err(FormatError::Unparsable(s.to_owned()));
    };

    let body = body.trim();
    let (hour_str, minute_str) = match body.split_once(':') {
        Some((h, m)) => (h, Some(m)),
        None => (body, None),
    };

    let hour: u32 = hour_str
        .parse()
        .map_err(|_| FormatError::Unparsable(s.to_owned()))?;
    let minute: u32 = match minute_str {
        Some(m) => m.parse().map_err(|_| FormatError::Unparsable(s.to_owned()))?,
        None => 0,
    };

    if !(1..=12).contains(&hour) || minute >= 60 {
        return Err(FormatError::OutOfRange(s.to_owned()));
    }

    // 12 AM is midnight, 12 PM is noon.
    let hour24 = (hour % 12) + if is_pm { 12 } else { 0 };
    Ok(hour24 * 60 + minute)
}

/// Format minutes of day as a 12-hour time string with meridiem, e.g.
/// `format_time(540) == "9:00 AM"`. The value must be below
/// [`MINUTES_PER_DAY`].
pub fn format_time(minutes: u32) -> String {
    let hour24 = minutes / 60;
    let minute = minutes % 60;
    let meridiem = if hour24 < 12 { "AM" } else { "PM" };
    let hour12 = match hour24 % 12 {
        0 => 12,
        h => h,
    };
    format!("{hour12}:{minute:02} {meridiem}")
}

/// Parse a `"<start> - <end>"` time range into a minute-of-day pair.
pub fn parse_range(s: &str) -> Result<(u32, u32), FormatError> {
    // Time strings never contain '-', so the first one splits the range.
    let (start, end) = s
        .split_once('-')
        .ok_or_else(|| FormatError::BadRange(s.to_owned()))?;
    Ok((parse_time(start)?, parse_time(end)?))
}

/// Format a minute-of-day pair as a `"<start> - <end>"` range string.
pub fn format_range(start: u32, end: u32) -> String {
    format!("{} - {}", format_time(start), format_time(end))
}

/// Format a span in minutes as a display duration: `"3 hours"`,
/// `"1 hour 30 minutes"`, `"45 minutes"`.
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    match (hours, rest) {
        (0, m) => format!("{m} minutes"),
        (1, 0) => "1 hour".to_owned(),
        (h, 0) => format!("{h} hours"),
        (1, m) => format!("1 hour {m} minutes"),
        (h, m) => format!("{h} hours {m} minutes"),
    }
}

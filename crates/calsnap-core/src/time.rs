//! Clock-time helpers for `HH:MM` strings and compact date formatting.
//!
//! Clock times travel through the pipeline as strings (see
//! [`CalendarEvent`](crate::event::CalendarEvent)), so the arithmetic the
//! normalizer and the encoders need lives here: parsing, the 15-minute
//! end-time bump, and the compact `YYYYMMDD`/`YYYYMMDDTHHMMSS` timestamps
//! used by the deep-link encoder.

use chrono::{NaiveDate, NaiveTime};

/// Minutes added to a start time when the source supplies no distinct end.
pub const DEFAULT_EVENT_MINUTES: u32 = 15;

/// Parses an `HH:MM` clock string into hour and minute components.
///
/// Both components must be plain non-negative integers; anything else
/// (missing colon, non-numeric parts) yields `None`. Out-of-range values
/// like `25:70` are accepted here; callers wrap them with wall-clock
/// arithmetic, matching how the rest of the pipeline treats them.
pub fn parse_clock(time: &str) -> Option<(u32, u32)> {
    let (hours, minutes) = time.trim().split_once(':')?;
    let hours = hours.parse::<u32>().ok()?;
    let minutes = minutes.parse::<u32>().ok()?;
    Some((hours, minutes))
}

/// Adds `minutes` to an `HH:MM` clock string, wrapping within the day.
///
/// Returns `None` if the time string cannot be parsed. There is no date
/// rollover: `23:50` plus 15 minutes is `00:05` on the same nominal date.
pub fn add_minutes(time: &str, minutes: u32) -> Option<String> {
    let (h, m) = parse_clock(time)?;
    // Widened so absurd hour components wrap instead of overflowing.
    let total = (u64::from(h) * 60 + u64::from(m) + u64::from(minutes)) % (24 * 60);
    Some(format!("{:02}:{:02}", total / 60, total % 60))
}

/// Converts an `HH:MM` clock string to a [`NaiveTime`], wrapping within the day.
pub fn to_naive_time(time: &str) -> Option<NaiveTime> {
    let (h, m) = parse_clock(time)?;
    let total = (u64::from(h) * 60 + u64::from(m)) % (24 * 60);
    NaiveTime::from_hms_opt((total / 60) as u32, (total % 60) as u32, 0)
}

/// Formats a date as the compact `YYYYMMDD` form used in calendar URLs.
pub fn compact_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Formats a date plus clock time as a compact local `YYYYMMDDTHHMMSS`
/// timestamp, with no timezone designator.
///
/// Unparseable clock strings fall back to stripping the colon, which keeps
/// the output shape stable even for malformed input.
pub fn compact_date_time(date: NaiveDate, time: &str) -> String {
    let clock = match parse_clock(time) {
        Some((h, m)) => format!("{:02}{:02}00", h % 24, m % 60),
        None => format!("{}00", time.replace(':', "")),
    };
    format!("{}T{}", compact_date(date), clock)
}

//! Event normalization: raw oracle records to canonical events.
//!
//! [`normalize_event`] is total. Whatever the oracle supplied (or failed
//! to supply), the output is a [`CalendarEvent`] with every field filled
//! in: missing or empty fields take their documented defaults, the start
//! date falls back to the caller's current date, and the all-day
//! discriminant is enforced (no start time means no end time either).
//!
//! The one rule with real logic is end-time inference: a timed event with
//! no distinct end gets `start + 15 minutes`, computed with same-day
//! wall-clock wrapping. An event starting at 23:50 ends at 00:05 on the
//! same nominal date, with no date rollover.

use chrono::NaiveDate;
use tracing::warn;

use calsnap_core::time::DEFAULT_EVENT_MINUTES;
use calsnap_core::{CalendarEvent, Recurrence, UNTITLED_ACTIVITY, add_minutes};

use crate::raw_event::RawEventRecord;

/// Treats missing and empty strings identically.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Resolves the end time of a timed event.
///
/// A supplied end that differs from the start passes through. A missing
/// end, or one equal to the start, is bumped to `start + 15 minutes`.
/// When the start time cannot be parsed the supplied value is kept as-is.
fn infer_end_time(start: &str, supplied: Option<&str>) -> Option<String> {
    match supplied {
        Some(end) if end != start => Some(end.to_string()),
        _ => add_minutes(start, DEFAULT_EVENT_MINUTES).or_else(|| supplied.map(str::to_string)),
    }
}

fn parse_date(raw: &str, field: &str) -> Option<NaiveDate> {
    match raw.parse::<NaiveDate>() {
        Ok(date) => Some(date),
        Err(_) => {
            warn!(field, value = raw, "unparseable date in oracle output");
            None
        }
    }
}

/// Normalizes one raw oracle record into a canonical event.
pub fn normalize_event(record: &RawEventRecord, today: NaiveDate) -> CalendarEvent {
    let activity = non_empty(record.activity.as_deref())
        .unwrap_or(UNTITLED_ACTIVITY)
        .to_string();

    let date = non_empty(record.date.as_deref())
        .and_then(|raw| parse_date(raw, "date"))
        .unwrap_or(today);

    let end_date = non_empty(record.end_date.as_deref()).and_then(|raw| parse_date(raw, "endDate"));

    let start_time = non_empty(record.start_time.as_deref()).map(str::to_string);

    // All-day events carry no times; a stray end time is dropped.
    let end_time = start_time
        .as_deref()
        .and_then(|start| infer_end_time(start, non_empty(record.end_time.as_deref())));

    let recurrence = match non_empty(record.recurrence.as_deref()) {
        Some(raw) => Recurrence::parse(raw).unwrap_or_else(|| {
            warn!(value = raw, "unknown recurrence keyword, treating as non-repeating");
            Recurrence::None
        }),
        None => Recurrence::None,
    };

    CalendarEvent {
        activity,
        date: Some(date),
        end_date,
        start_time,
        end_time,
        location: record.location.clone().unwrap_or_default(),
        notes: record.notes.clone().unwrap_or_default(),
        recurrence,
    }
}

/// Normalizes a full batch of raw records.
pub fn normalize_events(records: &[RawEventRecord], today: NaiveDate) -> Vec<CalendarEvent> {
    records
        .iter()
        .map(|record| normalize_event(record, today))
        .collect()
}

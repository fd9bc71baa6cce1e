//! iCalendar file encoder.
//!
//! [`calendar_document`] serializes the full event list into one
//! iCalendar document for bulk import. Timed events are emitted as
//! floating local timestamps (no timezone), matching the deep-link
//! encoder; all-day events use `VALUE=DATE` entries, with the inclusive
//! `end_date` converted to the exclusive boundary iCalendar expects.
//!
//! Events that cannot be placed on the calendar (no date, or a start
//! time that does not parse) are skipped with a warning rather than
//! failing the export. A partial file the user can import beats no file.

use chrono::{Days, NaiveDate, NaiveDateTime};
use icalendar::{Calendar, Component, Event, EventLike};
use tracing::warn;

use calsnap_core::{CalendarEvent, to_naive_time};

/// Display name embedded in the generated calendar.
pub const CALENDAR_NAME: &str = "CalSnap Schedule";

/// Suggested filename for the generated document.
pub const SCHEDULE_FILENAME: &str = "schedule.ics";

/// Resolves the end instant of a timed event.
///
/// Priority, highest first: explicit end date and time, end date with
/// the start's clock, end time on the start date, then one hour after
/// the start.
fn timed_end(event: &CalendarEvent, date: NaiveDate, start: NaiveDateTime) -> NaiveDateTime {
    let end_clock = event.end_time.as_deref().and_then(to_naive_time);
    match (event.end_date, end_clock) {
        (Some(end_date), Some(clock)) => end_date.and_time(clock),
        (Some(end_date), None) => end_date.and_time(start.time()),
        (None, Some(clock)) => date.and_time(clock),
        (None, None) => start + chrono::Duration::hours(1),
    }
}

fn encode_event(event: &CalendarEvent, date: NaiveDate) -> Option<Event> {
    let mut entry = Event::new();
    entry.summary(&event.activity);

    match &event.start_time {
        None => {
            if let Some(end_date) = event.end_date {
                // Inclusive final day to exclusive DTEND.
                let exclusive_end = end_date.checked_add_days(Days::new(1)).unwrap_or(end_date);
                entry.starts(date);
                entry.ends(exclusive_end);
            } else {
                entry.all_day(date);
            }
        }
        Some(start) => {
            let Some(start_clock) = to_naive_time(start) else {
                warn!(
                    activity = %event.activity,
                    start_time = %start,
                    "skipping event with unparseable start time"
                );
                return None;
            };
            let start_dt = date.and_time(start_clock);
            entry.starts(start_dt);
            entry.ends(timed_end(event, date, start_dt));
        }
    }

    if !event.location.is_empty() {
        entry.location(&event.location);
    }
    if !event.notes.is_empty() {
        entry.description(&event.notes);
    }
    if let Some(freq) = event.recurrence.frequency() {
        let rule = format!("FREQ={freq}");
        entry.add_property("RRULE", rule.as_str());
    }

    Some(entry.done())
}

/// Encodes the event list as a single iCalendar document.
///
/// Events with no start date are skipped; partial export is acceptable.
pub fn calendar_document(events: &[CalendarEvent]) -> String {
    let mut calendar = Calendar::new();
    calendar.name(CALENDAR_NAME);

    for event in events {
        let Some(date) = event.date else {
            warn!(activity = %event.activity, "skipping event with no date");
            continue;
        };
        if let Some(entry) = encode_event(event, date) {
            calendar.push(entry);
        }
    }

    calendar.done().to_string()
}

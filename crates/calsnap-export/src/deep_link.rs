//! Google Calendar deep-link encoder.
//!
//! [`share_url`] renders one event as a
//! `calendar.google.com/calendar/render?action=TEMPLATE` URL that opens
//! the calendar UI pre-filled. Timestamps are naive local time with no
//! timezone designator; Google interprets them in the viewer's calendar
//! timezone, which is what a schedule photographed off a wall actually
//! means.
//!
//! The encoder is invoked from display contexts, so a missing start date
//! yields the [`UNAVAILABLE_LINK`] sentinel instead of an error. A dead
//! link is preferable to a crash mid-render.

use chrono::Days;
use url::Url;

use calsnap_core::{CalendarEvent, compact_date, compact_date_time};

/// Base endpoint for the event-template deep link.
const RENDER_URL: &str = "https://calendar.google.com/calendar/render";

/// Sentinel returned when an event has no start date.
pub const UNAVAILABLE_LINK: &str = "#";

/// Formats the `dates` parameter for an event known to have a date.
fn dates_param(event: &CalendarEvent, date: chrono::NaiveDate) -> String {
    match &event.start_time {
        // All-day: whole-day range with an exclusive upper bound.
        None => {
            let last = event.end_date.unwrap_or(date);
            let exclusive_end = last.checked_add_days(Days::new(1)).unwrap_or(last);
            format!("{}/{}", compact_date(date), compact_date(exclusive_end))
        }
        Some(start) => {
            let end_date = event.end_date.unwrap_or(date);
            let end_time = event.end_time.as_deref().unwrap_or(start);
            format!(
                "{}/{}",
                compact_date_time(date, start),
                compact_date_time(end_date, end_time)
            )
        }
    }
}

/// Encodes one event as a Google Calendar pre-fill URL.
///
/// Returns [`UNAVAILABLE_LINK`] when the event has no start date.
pub fn share_url(event: &CalendarEvent) -> String {
    let Some(date) = event.date else {
        return UNAVAILABLE_LINK.to_string();
    };

    // RENDER_URL is a constant known-good absolute URL.
    let mut url = Url::parse(RENDER_URL).unwrap_or_else(|_| unreachable!());

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("action", "TEMPLATE");
        query.append_pair("text", &event.activity);
        query.append_pair("dates", &dates_param(event, date));

        if !event.notes.is_empty() {
            query.append_pair("details", &event.notes);
        }
        if !event.location.is_empty() {
            query.append_pair("location", &event.location);
        }
        if let Some(freq) = event.recurrence.frequency() {
            query.append_pair("recur", &format!("RRULE:FREQ={freq}"));
        }
    }

    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use calsnap_core::Recurrence;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn timed_event_uses_compact_local_timestamps() {
        let event = CalendarEvent::new("Team Sync", date(2025, 3, 1))
            .with_times("09:00", Some("09:30".to_string()));

        let url = share_url(&event);
        assert!(url.contains("dates=20250301T090000%2F20250301T093000"));

        insta::assert_snapshot!(
            url,
            @"https://calendar.google.com/calendar/render?action=TEMPLATE&text=Team+Sync&dates=20250301T090000%2F20250301T093000"
        );
    }

    #[test]
    fn all_day_single_day_has_exclusive_next_day_end() {
        let event = CalendarEvent::new("Moving day", date(2025, 3, 1));
        let url = share_url(&event);
        assert!(url.contains("dates=20250301%2F20250302"));
    }

    #[test]
    fn all_day_span_end_is_inclusive_plus_one() {
        let event =
            CalendarEvent::new("Offsite", date(2025, 6, 10)).with_end_date(date(2025, 6, 12));
        let url = share_url(&event);
        assert!(url.contains("dates=20250610%2F20250613"));
    }

    #[test]
    fn timed_event_without_end_time_reuses_start() {
        let mut event = CalendarEvent::new("Call", date(2025, 3, 1));
        event.start_time = Some("14:00".to_string());
        let url = share_url(&event);
        assert!(url.contains("dates=20250301T140000%2F20250301T140000"));
    }

    #[test]
    fn notes_and_location_become_details_and_location_params() {
        let event = CalendarEvent::new("Dentist", date(2025, 4, 2))
            .with_times("14:00", Some("14:30".to_string()))
            .with_location("12 Main St")
            .with_notes("Bring insurance card");

        insta::assert_snapshot!(
            share_url(&event),
            @"https://calendar.google.com/calendar/render?action=TEMPLATE&text=Dentist&dates=20250402T140000%2F20250402T143000&details=Bring+insurance+card&location=12+Main+St"
        );
    }

    #[test]
    fn recurrence_is_encoded_as_a_frequency_rule() {
        let event = CalendarEvent::new("Standup", date(2025, 3, 3))
            .with_times("09:00", Some("09:15".to_string()))
            .with_recurrence(Recurrence::Weekly);

        let url = share_url(&event);
        assert!(url.contains("recur=RRULE%3AFREQ%3DWEEKLY"));
    }

    #[test]
    fn non_repeating_event_has_no_recur_param() {
        let event = CalendarEvent::new("Once", date(2025, 3, 3));
        assert!(!share_url(&event).contains("recur="));
    }

    #[test]
    fn missing_date_yields_sentinel() {
        let mut event = CalendarEvent::new("Edited away", date(2025, 3, 1));
        event.date = None;
        assert_eq!(share_url(&event), UNAVAILABLE_LINK);
    }
}

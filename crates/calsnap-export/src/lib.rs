//! Export encoders for normalized calendar events.
//!
//! Two independent, stateless encoders:
//!
//! - [`share_url`]: one event at a time, as a Google Calendar pre-fill
//!   deep link
//! - [`calendar_document`]: the whole list, as a single iCalendar
//!   document for bulk import
//!
//! Both treat event times as naive local time and convert the data
//! model's inclusive `end_date` to the exclusive boundaries the target
//! formats expect.

pub mod deep_link;
pub mod ics;

pub use deep_link::{UNAVAILABLE_LINK, share_url};
pub use ics::{CALENDAR_NAME, SCHEDULE_FILENAME, calendar_document};

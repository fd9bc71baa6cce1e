//! Core types: events, recurrence, clock-time helpers, tracing setup

pub mod event;
pub mod time;
pub mod tracing;

pub use event::{CalendarEvent, Recurrence, UNTITLED_ACTIVITY};
pub use time::{add_minutes, compact_date, compact_date_time, parse_clock, to_naive_time};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};

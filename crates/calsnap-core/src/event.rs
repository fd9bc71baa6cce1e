//! The canonical calendar event entity.
//!
//! This module provides the types shared by every stage of the pipeline:
//! - [`CalendarEvent`]: a fully normalized, editable calendar event
//! - [`Recurrence`]: the supported repetition frequencies
//!
//! A `CalendarEvent` only ever exists on the far side of the normalizer:
//! every field has been defaulted, so consumers (the export encoders, the
//! store, display code) never re-check for missing activity names or
//! stray end times on all-day events.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Display name used when the source material carries no activity name.
pub const UNTITLED_ACTIVITY: &str = "Untitled Event";

/// How often an event repeats.
///
/// Only simple frequency rules are supported: no interval, count, or
/// until-date. `None` means the event occurs exactly once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    /// The event does not repeat.
    #[default]
    None,
    /// The event repeats every day.
    Daily,
    /// The event repeats every week.
    Weekly,
    /// The event repeats every month.
    Monthly,
}

impl Recurrence {
    /// Parses a recurrence keyword, case-insensitively.
    ///
    /// Returns `Option::None` for anything outside the enumerated set so the
    /// caller can decide how to handle unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }

    /// Returns the iCalendar `FREQ` value, or `None` for non-repeating events.
    pub fn frequency(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Daily => Some("DAILY"),
            Self::Weekly => Some("WEEKLY"),
            Self::Monthly => Some("MONTHLY"),
        }
    }

    /// Returns the lowercase keyword for this recurrence.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A normalized calendar event.
///
/// # Field semantics
///
/// - `date` is the start date. The normalizer always fills it in (falling
///   back to the current date), but callers may clear it while editing,
///   which is why the encoders tolerate `None`.
/// - `end_date` is present only when the event explicitly spans multiple
///   days and is **inclusive** of the final day. Encoders that emit
///   exclusive-end ranges must add one day themselves.
/// - `start_time == None` means the event is all-day; all-day events carry
///   no times at all. Clock times stay as `HH:MM` strings because the
///   normalizer passes unparseable values through unchanged rather than
///   losing them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Display name of the event. Never empty after normalization.
    pub activity: String,

    /// Start date of the event.
    pub date: Option<NaiveDate>,

    /// Final day of a multi-day event, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    /// Start clock time (`HH:MM`, 24-hour). `None` means all-day.
    pub start_time: Option<String>,

    /// End clock time. Meaningful only when `start_time` is set.
    pub end_time: Option<String>,

    /// Free-text location. Empty when unknown.
    #[serde(default)]
    pub location: String,

    /// Free-text notes: links, agenda items, reminders.
    #[serde(default)]
    pub notes: String,

    /// Repetition frequency.
    #[serde(default)]
    pub recurrence: Recurrence,
}

impl CalendarEvent {
    /// Creates a single-day, all-day event with the given activity and date.
    pub fn new(activity: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            activity: activity.into(),
            date: Some(date),
            end_date: None,
            start_time: None,
            end_time: None,
            location: String::new(),
            notes: String::new(),
            recurrence: Recurrence::None,
        }
    }

    /// Builder method to set the start and end clock times.
    pub fn with_times(
        mut self,
        start: impl Into<String>,
        end: impl Into<Option<String>>,
    ) -> Self {
        self.start_time = Some(start.into());
        self.end_time = end.into();
        self
    }

    /// Builder method to set the inclusive end date of a multi-day event.
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Builder method to set the notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Builder method to set the recurrence.
    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    /// Returns `true` if this is an all-day event (no start time).
    pub fn is_all_day(&self) -> bool {
        self.start_time.is_none()
    }

    /// Returns `true` if the event explicitly spans more than one day.
    pub fn is_multi_day(&self) -> bool {
        match (self.date, self.end_date) {
            (Some(start), Some(end)) => end > start,
            _ => false,
        }
    }

    /// Returns the last day the event occupies (inclusive).
    pub fn last_day(&self) -> Option<NaiveDate> {
        self.end_date.or(self.date)
    }

    /// Returns `true` if the event repeats.
    pub fn is_recurring(&self) -> bool {
        self.recurrence != Recurrence::None
    }
}

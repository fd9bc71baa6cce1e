//! Raw event records as the oracle emits them.
//!
//! This module defines [`RawEventRecord`], the unvalidated, partially-typed
//! shape of one event inside the oracle's JSON response. Every field is
//! optional: the model omits fields, sets them to `null`, or fills them
//! with empty strings depending on the source material and its mood.
//!
//! A raw record never survives past the normalizer boundary; it exists
//! only as the input contract of
//! [`normalize_event`](crate::normalize::normalize_event).

use serde::{Deserialize, Serialize};

/// One event as described by the oracle, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEventRecord {
    /// Display name of the event.
    pub activity: Option<String>,

    /// Start date, nominally `YYYY-MM-DD`.
    pub date: Option<String>,

    /// Final day of a multi-day event, nominally `YYYY-MM-DD`.
    pub end_date: Option<String>,

    /// Start clock time, nominally `HH:MM`. `null` signals an all-day event.
    pub start_time: Option<String>,

    /// End clock time, nominally `HH:MM`.
    pub end_time: Option<String>,

    /// Free-text location.
    pub location: Option<String>,

    /// Free-text notes extracted from the surrounding context.
    pub notes: Option<String>,

    /// Recurrence keyword (`none`, `daily`, `weekly`, `monthly`).
    pub recurrence: Option<String>,
}

impl RawEventRecord {
    /// Creates an empty record. Useful as a test fixture base.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the activity.
    pub fn with_activity(mut self, activity: impl Into<String>) -> Self {
        self.activity = Some(activity.into());
        self
    }

    /// Builder method to set the start date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Builder method to set the end date.
    pub fn with_end_date(mut self, end_date: impl Into<String>) -> Self {
        self.end_date = Some(end_date.into());
        self
    }

    /// Builder method to set the start time.
    pub fn with_start_time(mut self, start_time: impl Into<String>) -> Self {
        self.start_time = Some(start_time.into());
        self
    }

    /// Builder method to set the end time.
    pub fn with_end_time(mut self, end_time: impl Into<String>) -> Self {
        self.end_time = Some(end_time.into());
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set the notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Builder method to set the recurrence keyword.
    pub fn with_recurrence(mut self, recurrence: impl Into<String>) -> Self {
        self.recurrence = Some(recurrence.into());
        self
    }
}

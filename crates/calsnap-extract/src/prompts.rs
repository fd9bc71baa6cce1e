//! Instruction profiles and the model catalog.
//!
//! Two fixed instruction templates drive the oracle: one tuned for
//! photographed/screenshotted schedule tables (layout parsing, date-range
//! detection) and one for free-text descriptions (relative-date resolution
//! anchored to a supplied current date, context-to-notes extraction).
//! Both demand plain JSON output; the response parser still tolerates
//! markdown fences because models ignore that demand often enough.

use std::fmt;

/// System prompt for extracting events from a schedule image.
pub const IMAGE_SYSTEM_PROMPT: &str = r#"
Analyze this schedule image and extract calendar events.

Instructions:
1. Identify table structure or calendar layout.
2. Extract each event with: activity name, date, start time(if shown), end time(if shown).
3. ** IMPORTANT **: Detect date ranges - if you see patterns like "Dec 1 - Dec 5", "Tgl 1 - 5", "2026-01-01 - 2026-01-03", or "{date} - {date}", extract BOTH the start date and end date.
4. Return a JSON array: [{ "activity": "string", "date": "YYYY-MM-DD", "endDate": "YYYY-MM-DD" or null, "startTime": "HH:MM" or null, "endTime": "HH:MM" or null }]
5. Set "endDate" ONLY when the event explicitly spans multiple days. For single-day events, set endDate to null or omit it.
6. If date is ambiguous, use best guess based on context (assume current year if missing).
7. If time is not shown in the schedule, set startTime and endTime to null (for all-day events).
8. Return ONLY valid JSON, no markdown, no explanations.
"#;

/// System prompt for extracting events from a free-text message.
pub const TEXT_SYSTEM_PROMPT: &str = r#"
Analyze this message and extract calendar events.

Instructions:
1. Extract each event with: activity name, date, start time, end time.
2. ** CRITICAL **: Calculate relative dates based on the [Current Date] provided in the user prompt.
   - "Tomorrow" = Current Date + 1 day
   - "Next Friday" = The next Friday occurring after Current Date
   - "This Monday" = The Monday of this week (or next if passed)
3. ** Notes **: Extract context (Zoom links, locations, agendas, "don't forget", "bring laptop") into the "notes" field.
4. Return a JSON array: [{ "activity": "string", "date": "YYYY-MM-DD", "endDate": "YYYY-MM-DD" or null, "startTime": "HH:MM" or null, "endTime": "HH:MM" or null, "location": "string", "notes": "string" }]
5. If time is not specified, set startTime/endTime to null (all-day).
6. Return ONLY valid JSON.
"#;

/// Which of the two fixed instruction templates to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionProfile {
    /// Table/layout parsing and date-range detection.
    ImageExtraction,
    /// Relative-date resolution and context-to-notes extraction.
    TextExtraction,
}

impl InstructionProfile {
    /// Returns the system prompt for this profile.
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Self::ImageExtraction => IMAGE_SYSTEM_PROMPT,
            Self::TextExtraction => TEXT_SYSTEM_PROMPT,
        }
    }
}

/// A selectable vision/text model, by stable alias.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModelAlias {
    /// Google's fast multimodal model.
    Google,
    /// Qwen's vision-language model (default).
    #[default]
    Qwen,
}

impl ModelAlias {
    /// Returns the provider model identifier sent to the oracle.
    pub fn model_id(&self) -> &'static str {
        match self {
            Self::Google => "google/gemini-3-flash-preview",
            Self::Qwen => "qwen/qwen3-vl-235b-a22b-instruct",
        }
    }

    /// Returns the human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Qwen => "Qwen",
        }
    }

    /// Parses an alias, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "google" => Some(Self::Google),
            "qwen" => Some(Self::Qwen),
            _ => None,
        }
    }
}

impl fmt::Display for ModelAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Google => write!(f, "google"),
            Self::Qwen => write!(f, "qwen"),
        }
    }
}

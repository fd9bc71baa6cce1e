//! Response parsing: from raw oracle text to raw event records.
//!
//! The oracle is asked for plain JSON but answers in several shapes: a bare
//! array, an `{"events": [...]}` wrapper, an arbitrary single-key wrapper
//! (`{"schedule": [...]}`), or one naked event object, frequently inside
//! markdown code fences it was told not to use. [`parse_events`] resolves
//! all of that into a `Vec<RawEventRecord>` through an ordered chain of
//! fallible decodes, first match wins:
//!
//! 1. the response is directly an array
//! 2. an object with an array-valued `events` field
//! 3. an object whose first array-valued field holds the events
//! 4. an object that itself looks like a single event (has `activity`
//!    and `date`)
//!
//! Anything else is an [`UnrecognizedShape`] error, and a structurally
//! valid but empty result is a [`NoEvents`] error: a successful
//! extraction always yields at least one event.
//!
//! [`UnrecognizedShape`]: crate::error::ExtractErrorCode::UnrecognizedShape
//! [`NoEvents`]: crate::error::ExtractErrorCode::NoEvents

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::{ExtractError, ExtractResult};
use crate::raw_event::RawEventRecord;

/// Matches a leading or trailing markdown code fence.
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*```(?:json)?\s*|\s*```\s*$").expect("valid fence regex"));

/// Strips a surrounding markdown code fence, if present.
pub fn strip_code_fences(raw: &str) -> String {
    FENCE_RE.replace_all(raw, "").trim().to_string()
}

/// Parses the oracle's raw text into raw event records.
///
/// # Errors
///
/// - `MalformedJson` when the (fence-stripped) text is not valid JSON
/// - `UnrecognizedShape` when no event structure can be located
/// - `NoEvents` when the structure resolves to zero events
pub fn parse_events(raw_text: &str) -> ExtractResult<Vec<RawEventRecord>> {
    let cleaned = strip_code_fences(raw_text);

    let value: Value = serde_json::from_str(&cleaned).map_err(|e| {
        ExtractError::malformed_json("oracle response is not valid JSON").with_source(e)
    })?;

    let records = resolve_structure(value)?;

    if records.is_empty() {
        return Err(ExtractError::no_events("no events extracted from response"));
    }

    Ok(records)
}

/// Resolves the structural ambiguity of the oracle's JSON output.
fn resolve_structure(value: Value) -> ExtractResult<Vec<RawEventRecord>> {
    let map = match value {
        Value::Array(_) => return decode_records(value),
        Value::Object(map) => map,
        other => {
            return Err(ExtractError::unrecognized_shape(format!(
                "expected an array or object, got {}",
                type_name(&other)
            )));
        }
    };

    if let Some(events) = map.get("events").filter(|v| v.is_array()) {
        return decode_records(events.clone());
    }

    if let Some((key, array)) = map.iter().find(|(_, v)| v.is_array()) {
        debug!(field = %key, "resolving events through array-valued wrapper field");
        return decode_records(array.clone());
    }

    if map.contains_key("activity") && map.contains_key("date") {
        let record: RawEventRecord =
            serde_json::from_value(Value::Object(map)).map_err(|e| {
                ExtractError::unrecognized_shape("single event object failed to decode")
                    .with_source(e)
            })?;
        return Ok(vec![record]);
    }

    Err(ExtractError::unrecognized_shape(
        "could not locate event structure in response",
    ))
}

fn decode_records(value: Value) -> ExtractResult<Vec<RawEventRecord>> {
    serde_json::from_value(value).map_err(|e| {
        ExtractError::unrecognized_shape("event array failed to decode").with_source(e)
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractErrorCode;

    mod fences {
        use super::*;

        #[test]
        fn strips_json_fence() {
            let raw = "```json\n[{\"activity\":\"X\"}]\n```";
            assert_eq!(strip_code_fences(raw), "[{\"activity\":\"X\"}]");
        }

        #[test]
        fn strips_bare_fence() {
            let raw = "```\n[]\n```";
            assert_eq!(strip_code_fences(raw), "[]");
        }

        #[test]
        fn leaves_plain_text_alone() {
            assert_eq!(strip_code_fences("  [1, 2]  "), "[1, 2]");
        }
    }

    mod structural_resolution {
        use super::*;

        #[test]
        fn bare_array() {
            let records =
                parse_events(r#"[{"activity":"Standup","date":"2025-03-01"}]"#).unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].activity.as_deref(), Some("Standup"));
        }

        #[test]
        fn events_wrapper() {
            let records =
                parse_events(r#"{"events":[{"activity":"A"},{"activity":"B"}]}"#).unwrap();
            assert_eq!(records.len(), 2);
            assert_eq!(records[1].activity.as_deref(), Some("B"));
        }

        #[test]
        fn arbitrary_wrapper_key() {
            let records =
                parse_events(r#"{"schedule":[{"activity":"X","date":"2025-01-01"}]}"#).unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].date.as_deref(), Some("2025-01-01"));
        }

        #[test]
        fn wrapper_scan_follows_document_order() {
            // Two array-valued wrapper fields: the one written first wins,
            // not the alphabetically-first one.
            let records = parse_events(
                r#"{"zebra":[{"activity":"First"}],"alpha":[{"activity":"Second"}]}"#,
            )
            .unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].activity.as_deref(), Some("First"));
        }

        #[test]
        fn non_array_events_field_falls_through_to_wrapper_scan() {
            let records =
                parse_events(r#"{"events":"oops","items":[{"activity":"Y"}]}"#).unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].activity.as_deref(), Some("Y"));
        }

        #[test]
        fn single_event_object() {
            let records =
                parse_events(r#"{"activity":"Dentist","date":"2025-04-02","startTime":"14:00"}"#)
                    .unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].start_time.as_deref(), Some("14:00"));
        }

        #[test]
        fn fenced_array() {
            let raw = "```json\n[{\"activity\":\"Fenced\",\"date\":\"2025-05-05\"}]\n```";
            let records = parse_events(raw).unwrap();
            assert_eq!(records[0].activity.as_deref(), Some("Fenced"));
        }
    }

    mod failures {
        use super::*;

        #[test]
        fn invalid_json_is_malformed() {
            let err = parse_events("the schedule shows three events").unwrap_err();
            assert_eq!(err.code(), ExtractErrorCode::MalformedJson);
        }

        #[test]
        fn empty_array_is_no_events() {
            let err = parse_events("[]").unwrap_err();
            assert_eq!(err.code(), ExtractErrorCode::NoEvents);
        }

        #[test]
        fn empty_wrapper_is_no_events() {
            let err = parse_events(r#"{"events":[]}"#).unwrap_err();
            assert_eq!(err.code(), ExtractErrorCode::NoEvents);
        }

        #[test]
        fn object_without_structure_is_unrecognized() {
            let err = parse_events(r#"{"message":"no events found"}"#).unwrap_err();
            assert_eq!(err.code(), ExtractErrorCode::UnrecognizedShape);
        }

        #[test]
        fn scalar_is_unrecognized() {
            let err = parse_events("42").unwrap_err();
            assert_eq!(err.code(), ExtractErrorCode::UnrecognizedShape);
        }
    }
}

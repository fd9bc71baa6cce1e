//! Event extraction pipeline: oracle invocation, parsing, normalization.
//!
//! This crate turns an image or free-text schedule payload into
//! normalized [`CalendarEvent`](calsnap_core::CalendarEvent)s:
//!
//! ```text
//! payload ─► OracleClient ─► raw text ─► parse_events ─► RawEventRecord*
//!                                                            │
//!                              CalendarEvent* ◄─ normalize_events
//! ```
//!
//! [`Extractor`] drives the whole chain with bounded exponential-backoff
//! retry; [`OracleClient`] is the production transport and
//! [`CompletionTransport`] the seam tests script against.

pub mod error;
pub mod extract;
pub mod normalize;
pub mod oracle;
pub mod parse;
pub mod prompts;
pub mod raw_event;

pub use error::{ExtractError, ExtractErrorCode, ExtractResult};
pub use extract::{ExtractRequest, Extraction, Extractor, RetryPolicy};
pub use normalize::{normalize_event, normalize_events};
pub use oracle::{
    Completion, CompletionRequest, CompletionTransport, OracleClient, OraclePayload, Usage,
};
pub use parse::parse_events;
pub use prompts::{InstructionProfile, ModelAlias};
pub use raw_event::RawEventRecord;

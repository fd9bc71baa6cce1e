//! Error types for the extraction pipeline.
//!
//! Every failure between "payload handed to the oracle" and "normalized
//! events returned" is an [`ExtractError`] carrying an
//! [`ExtractErrorCode`]. The code is what callers branch on: user-facing
//! messaging needs to distinguish "the service kept failing" from "the
//! model answered with something we could not read".

use std::fmt;
use thiserror::Error;

/// The category of an extraction error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractErrorCode {
    /// Network error - connection failed, timeout, DNS resolution, etc.
    NetworkError,
    /// The oracle endpoint returned a non-success HTTP status.
    ServerError,
    /// The oracle responded but produced no message content.
    EmptyContent,
    /// The message content was not parseable JSON.
    MalformedJson,
    /// The JSON was valid but no event structure could be located in it.
    UnrecognizedShape,
    /// A recognized structure resolved to zero events.
    NoEvents,
    /// Configuration error - missing API key, invalid endpoint, etc.
    ConfigurationError,
}

impl ExtractErrorCode {
    /// Returns true if a retry may change the outcome.
    ///
    /// The retry loop consults only this predicate. Structural failures
    /// (`UnrecognizedShape`, `NoEvents`) are currently retryable too,
    /// since a fresh completion often comes back in a usable shape;
    /// tightening the policy is a per-code change here.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::ConfigurationError)
    }

    /// Returns a stable snake_case name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkError => "network_error",
            Self::ServerError => "server_error",
            Self::EmptyContent => "empty_content",
            Self::MalformedJson => "malformed_json",
            Self::UnrecognizedShape => "unrecognized_shape",
            Self::NoEvents => "no_events",
            Self::ConfigurationError => "configuration_error",
        }
    }
}

impl fmt::Display for ExtractErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred in the extraction pipeline.
#[derive(Debug, Error)]
pub struct ExtractError {
    /// The error code categorizing this error.
    code: ExtractErrorCode,
    /// A human-readable message describing the error.
    message: String,
    /// How many attempts were made before giving up, when the retry
    /// budget was exhausted.
    attempts: Option<u32>,
    /// The underlying cause of this error, if any.
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ExtractError {
    /// Creates a new extraction error with the given code and message.
    pub fn new(code: ExtractErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            attempts: None,
            source: None,
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ExtractErrorCode::NetworkError, message)
    }

    /// Creates a server error.
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ExtractErrorCode::ServerError, message)
    }

    /// Creates an empty-content error.
    pub fn empty_content(message: impl Into<String>) -> Self {
        Self::new(ExtractErrorCode::EmptyContent, message)
    }

    /// Creates a malformed-JSON error.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new(ExtractErrorCode::MalformedJson, message)
    }

    /// Creates an unrecognized-shape error.
    pub fn unrecognized_shape(message: impl Into<String>) -> Self {
        Self::new(ExtractErrorCode::UnrecognizedShape, message)
    }

    /// Creates a no-events error.
    pub fn no_events(message: impl Into<String>) -> Self {
        Self::new(ExtractErrorCode::NoEvents, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ExtractErrorCode::ConfigurationError, message)
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Marks this error as terminal after `attempts` exhausted attempts.
    pub fn after_attempts(mut self, attempts: u32) -> Self {
        self.attempts = Some(attempts);
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ExtractErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the number of attempts made, if the retry budget ran out.
    pub fn attempts(&self) -> Option<u32> {
        self.attempts
    }

    /// Returns true if the retry budget was exhausted on this error.
    pub fn is_exhausted(&self) -> bool {
        self.attempts.is_some()
    }

    /// Returns true if a retry may change the outcome.
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(attempts) = self.attempts {
            write!(f, " (after {} attempts)", attempts)?;
        }
        Ok(())
    }
}

/// A specialized Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

//! The extraction front door: oracle call, parse, normalize, retry.
//!
//! [`Extractor`] owns the whole pipeline for one payload. Each attempt
//! runs transport, parser, and normalizer end to end; any retryable
//! failure anywhere in that chain burns one unit of retry budget and
//! backs off exponentially before the next attempt. Structural failures
//! (the oracle answered, but with JSON we could not use) are retried the
//! same way as network failures, since a fresh completion often comes
//! back in a usable shape.
//!
//! The loop is the only stateful part of the pipeline, and its state is
//! local: an attempt counter and the last error, discarded at return.

use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use calsnap_core::CalendarEvent;

use crate::error::{ExtractError, ExtractResult};
use crate::normalize::normalize_events;
use crate::oracle::{CompletionRequest, CompletionTransport, OraclePayload, Usage};
use crate::parse::parse_events;

/// How often and how patiently to retry a failed extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay after the first failed attempt; doubles each time.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Returns the backoff delay after the given zero-based attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// One extraction job: which model, what payload, and the current date
/// used to anchor relative expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRequest {
    /// Provider model identifier.
    pub model: String,
    /// The image or text payload.
    pub payload: OraclePayload,
    /// The caller's current date.
    pub today: NaiveDate,
}

/// A successful extraction: normalized events plus usage counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// The normalized events, in oracle order.
    pub events: Vec<CalendarEvent>,
    /// Token usage, when the provider reports it.
    pub usage: Option<Usage>,
}

/// Runs extractions against a [`CompletionTransport`] with retry.
#[derive(Debug)]
pub struct Extractor<T> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: CompletionTransport> Extractor<T> {
    /// Creates an extractor with the default retry policy.
    pub fn new(transport: T) -> Self {
        Self::with_policy(transport, RetryPolicy::default())
    }

    /// Creates an extractor with a custom retry policy.
    pub fn with_policy(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Extracts normalized events from the request's payload.
    ///
    /// # Errors
    ///
    /// Returns the last attempt's error once the retry budget is
    /// exhausted, marked with the attempt count. Non-retryable errors
    /// (configuration) are returned immediately.
    pub async fn extract(&self, request: &ExtractRequest) -> ExtractResult<Extraction> {
        let mut last_error: Option<ExtractError> = None;

        for attempt in 0..self.policy.max_attempts {
            debug!(
                attempt = attempt + 1,
                max_attempts = self.policy.max_attempts,
                model = %request.model,
                "starting extraction attempt"
            );

            match self.attempt(request).await {
                Ok(extraction) => {
                    info!(
                        attempt = attempt + 1,
                        events = extraction.events.len(),
                        "extraction succeeded"
                    );
                    return Ok(extraction);
                }
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        attempt = attempt + 1,
                        code = %err.code(),
                        delay_ms = delay.as_millis() as u64,
                        "extraction attempt failed: {err}"
                    );
                    last_error = Some(err);
                    tokio::time::sleep(delay).await;
                }
            }
        }

        let err = last_error
            .unwrap_or_else(|| ExtractError::configuration("retry policy allows zero attempts"));
        Err(err.after_attempts(self.policy.max_attempts))
    }

    async fn attempt(&self, request: &ExtractRequest) -> ExtractResult<Extraction> {
        let completion = self
            .transport
            .complete(CompletionRequest {
                model: request.model.clone(),
                payload: request.payload.clone(),
                today: request.today,
            })
            .await?;

        let records = parse_events(&completion.content)?;
        let events = normalize_events(&records, request.today);

        Ok(Extraction {
            events,
            usage: completion.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractErrorCode;
    use crate::oracle::{BoxFuture, Completion};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Plays back a fixed script of completion results, one per call.
    /// Once the script runs out it keeps failing with empty content.
    struct ScriptedTransport {
        script: Mutex<VecDeque<ExtractResult<Completion>>>,
        calls: AtomicU32,
    }

    impl ScriptedTransport {
        fn new(script: Vec<ExtractResult<Completion>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl CompletionTransport for ScriptedTransport {
        fn complete(&self, _request: CompletionRequest) -> BoxFuture<'_, ExtractResult<Completion>> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                self.script
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or_else(|| Err(ExtractError::empty_content("script exhausted")))
            })
        }
    }

    fn completion(content: &str) -> ExtractResult<Completion> {
        Ok(Completion {
            content: content.to_string(),
            usage: Some(Usage {
                prompt_tokens: 800,
                completion_tokens: 120,
                total_tokens: 920,
            }),
        })
    }

    fn request() -> ExtractRequest {
        ExtractRequest {
            model: "qwen/qwen3-vl-235b-a22b-instruct".into(),
            payload: OraclePayload::Text {
                content: "standup tomorrow at 9".into(),
            },
            today: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        }
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn first_attempt_success_skips_retry() {
        let transport = ScriptedTransport::new(vec![completion(
            r#"[{"activity":"Standup","date":"2025-03-02","startTime":"09:00"}]"#,
        )]);
        let extractor = Extractor::new(transport);

        let extraction = extractor.extract(&request()).await.unwrap();

        assert_eq!(extraction.events.len(), 1);
        assert_eq!(extraction.events[0].activity, "Standup");
        assert_eq!(extraction.events[0].end_time.as_deref(), Some("09:15"));
        assert_eq!(extraction.usage.unwrap().total_tokens, 920);
        assert_eq!(extractor.transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failure_is_retried() {
        let transport = ScriptedTransport::new(vec![
            Err(ExtractError::network("connection reset")),
            completion(r#"{"events":[{"activity":"Retry win","date":"2025-03-02"}]}"#),
        ]);
        let extractor = Extractor::new(transport);

        let extraction = extractor.extract(&request()).await.unwrap();

        assert_eq!(extraction.events[0].activity, "Retry win");
        assert_eq!(extractor.transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn unusable_json_is_retried_like_a_network_failure() {
        let transport = ScriptedTransport::new(vec![
            completion("I found three events in your schedule!"),
            completion(r#"[{"activity":"Second try","date":"2025-03-02"}]"#),
        ]);
        let extractor = Extractor::new(transport);

        let extraction = extractor.extract(&request()).await.unwrap();
        assert_eq!(extraction.events[0].activity, "Second try");
        assert_eq!(extractor.transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_after_three_attempts_with_full_backoff_budget() {
        let transport = ScriptedTransport::new(vec![]);
        let extractor = Extractor::new(transport);

        let started = tokio::time::Instant::now();
        let err = extractor.extract(&request()).await.unwrap_err();

        assert_eq!(extractor.transport.calls(), 3);
        assert_eq!(err.code(), ExtractErrorCode::EmptyContent);
        assert!(err.is_exhausted());
        assert_eq!(err.attempts(), Some(3));
        // 1s + 2s + 4s of backoff across the three failed attempts.
        assert_eq!(started.elapsed(), Duration::from_secs(7));
    }

    #[tokio::test]
    async fn configuration_error_fails_fast() {
        let transport = ScriptedTransport::new(vec![Err(ExtractError::configuration(
            "API key is empty",
        ))]);
        let extractor = Extractor::new(transport);

        let err = extractor.extract(&request()).await.unwrap_err();

        assert_eq!(err.code(), ExtractErrorCode::ConfigurationError);
        assert!(!err.is_exhausted());
        assert_eq!(extractor.transport.calls(), 1);
    }
}

//! Retry utilities: backoff builders and retryable error classification.
//!
//! Uses `backon` for exponential backoff with jitter. Only query fetches
//! retry; mutations surface their first failure.

use backon::ExponentialBuilder;
use stockroom_client::ClientError;

use crate::config::CacheConfig;

/// Backoff for query fetches.
///
/// Defaults from [`CacheConfig`]:
/// - Min delay: 200ms
/// - Max delay: 5s
/// - Max attempts: 3
/// - Jitter enabled
pub fn query_backoff(config: &CacheConfig) -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(config.retry_min_delay())
        .with_max_delay(config.retry_max_delay())
        .with_max_times(config.retry_attempts)
        .with_jitter()
}

/// Determines if a failed query is worth repeating.
///
/// Retryable: connection failures, timeouts, 429 and 5xx answers.
///
/// Non-retryable: 401 (the session is gone), other 4xx answers, local
/// validation and decode failures. These will never succeed on retry.
pub fn is_retryable(err: &ClientError) -> bool {
    err.is_retryable()
}

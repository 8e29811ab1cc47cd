//! Politeness throttling and retry utilities for the store-search client.
//!
//! [`RequestThrottle`] spaces out request starts across every concurrent
//! region task. [`retry_with_backoff`] retries transient failures (network
//! errors, 429, 5xx) with exponential backoff and jitter; everything else is
//! returned on the first attempt.

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::ScraperError;

/// Upper bound on a single backoff sleep.
const MAX_BACKOFF_MS: u64 = 30_000;

/// Enforces a minimum gap between the starts of successive requests.
///
/// Shared by all in-flight region requests, so the gap holds even when
/// several regions are harvested concurrently.
#[derive(Debug)]
pub struct RequestThrottle {
    min_gap: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestThrottle {
    #[must_use]
    pub fn new(min_gap: Duration) -> Self {
        Self {
            min_gap,
            last_request: Mutex::new(None),
        }
    }

    /// Wait until at least `min_gap` has passed since the previous caller
    /// was released, then claim the slot.
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_gap {
                tokio::time::sleep(self.min_gap.saturating_sub(elapsed)).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Returns `true` if `err` is a transient condition worth retrying.
///
/// Retriable: [`ScraperError::RateLimited`], [`ScraperError::Http`] network
/// failures, and [`ScraperError::UnexpectedStatus`] with a 5xx code. Decode
/// and validation errors would fail the same way again.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } | ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => (500..600).contains(status),
        ScraperError::Deserialize { .. }
        | ScraperError::InvalidEndpoint { .. }
        | ScraperError::MissingField { .. }
        | ScraperError::InvalidCoordinate { .. }
        | ScraperError::InvalidTime { .. } => false,
    }
}

/// Backoff before retry number `attempt` (1-based): `base * 2^(attempt-1)`,
/// capped, then scaled by a random factor in `[0.75, 1.25)`.
///
/// A rate-limited response with a `Retry-After` hint waits at least that long.
fn backoff_delay(err: &ScraperError, attempt: u32, backoff_base_ms: u64) -> Duration {
    let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(16));
    let capped = computed.min(MAX_BACKOFF_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;

    let floor_ms = match err {
        ScraperError::RateLimited {
            retry_after_secs, ..
        } => retry_after_secs.saturating_mul(1000).min(MAX_BACKOFF_MS),
        _ => 0,
    };

    Duration::from_millis(jittered.max(floor_ms))
}

/// Executes `operation`, retrying transient errors up to `max_retries`
/// additional times.
///
/// With `max_retries = 2` the operation runs at most 3 times. Non-retriable
/// errors are returned immediately without sleeping.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay = backoff_delay(&err, attempt, backoff_base_ms);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "transient store-search error, retrying after backoff"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

//! Bounded retry with exponential backoff.
//!
//! [`retry`] wraps any fallible async operation: the call is attempted up
//! to [`RetryConfig::max_attempts`] times, waiting `base_delay × 2^(k−1)`
//! after the k-th failure (first wait equals the base delay, doubling
//! each time, capped at `max_delay`). Every failed attempt is logged with
//! the operation name and attempt number before the retry/give-up
//! decision, and the final failure is returned unchanged.
//!
//! Failures are classified through the [`Transient`] trait: permanent
//! errors (bad credentials, malformed responses) propagate immediately
//! instead of burning attempts. Setting [`RetryConfig::retry_all`]
//! disables classification and retries everything up to the cap.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use postbrief_types::config::RetrySettings;
use postbrief_types::ConnectorError;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts per call, including the first (>= 1).
    pub max_attempts: u32,
    /// Wait after the first failure; doubles after each subsequent one.
    pub base_delay: Duration,
    /// Upper bound on any single wait.
    pub max_delay: Duration,
    /// Retry every failure, ignoring [`Transient`] classification.
    pub retry_all: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(60),
            retry_all: false,
        }
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            base_delay: Duration::from_secs(settings.base_delay_secs),
            ..Self::default()
        }
    }
}

/// Classifies failures for the retry decision.
pub trait Transient {
    /// Whether a retry has a chance of succeeding.
    fn is_transient(&self) -> bool;

    /// A service-suggested wait, when the failure carries one
    /// (rate-limit responses). The actual wait is the larger of this and
    /// the computed backoff.
    fn suggested_delay_ms(&self) -> Option<u64> {
        None
    }
}

impl Transient for ConnectorError {
    fn is_transient(&self) -> bool {
        ConnectorError::is_transient(self)
    }

    fn suggested_delay_ms(&self) -> Option<u64> {
        ConnectorError::suggested_delay_ms(self)
    }
}

impl Transient for postbrief_llm::ProviderError {
    fn is_transient(&self) -> bool {
        postbrief_llm::ProviderError::is_transient(self)
    }

    fn suggested_delay_ms(&self) -> Option<u64> {
        postbrief_llm::ProviderError::suggested_delay_ms(self)
    }
}

/// Backoff wait after `failed_attempts` consecutive failures (1-based):
/// `base_delay × 2^(failed_attempts − 1)`, saturating, capped at
/// `max_delay`.
pub fn compute_delay(config: &RetryConfig, failed_attempts: u32) -> Duration {
    let exp = 2u64.saturating_pow(failed_attempts.saturating_sub(1));
    let base_ms = config.base_delay.as_millis() as u64;
    let raw_ms = base_ms.saturating_mul(exp);
    Duration::from_millis(raw_ms.min(config.max_delay.as_millis() as u64))
}

/// Run `op`, retrying transient failures with exponential backoff.
///
/// `operation` names the call in log entries. The final error after
/// exhausting the attempt budget is the operation's own last error,
/// never a substitute.
pub async fn retry<T, E, F, Fut>(config: &RetryConfig, operation: &str, mut op: F) -> Result<T, E>
where
    E: Transient + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(operation, attempt, "succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                warn!(operation, attempt, error = %err, "attempt failed");

                if attempt >= config.max_attempts || !(config.retry_all || err.is_transient()) {
                    return Err(err);
                }

                let mut delay = compute_delay(config, attempt);
                if let Some(suggested_ms) = err.suggested_delay_ms() {
                    delay = delay.max(Duration::from_millis(suggested_ms));
                }

                debug!(operation, delay_ms = delay.as_millis() as u64, "backing off");
                tokio::time::sleep(delay).await;
            }
        }
    }
}

//! Recovery heuristics: recoverability, retry decisions and backoff delays.
//!
//! Nothing in this module sleeps or retries. It supplies the *decision*
//! ([`should_retry`]) and the *delay* ([`get_retry_delay`],
//! [`get_backoff_delay`]); retry loops, timeouts and cancellation belong to
//! the caller.
//!
//! ```rust
//! use keystone_errors::{definitions, get_retry_delay, should_retry, RetryDelayOptions};
//! use std::time::Duration;
//!
//! let code = definitions::CONNECTION_RESET;
//! let options = RetryDelayOptions::default().with_jitter(false);
//!
//! assert!(should_retry(code, 0));
//! assert_eq!(get_retry_delay(2, &options), Duration::from_millis(4000));
//! assert!(!should_retry(code, 3));
//! ```
//!
//! # Jitter
//!
//! With jitter enabled the delay `d` (already clamped to `max_delay`) becomes
//! `floor(d + d * 0.1 * (2r - 1))` for uniform `r` in `[0, 1)`, kept inside
//! `[0.9 d, 1.1 d]`. Jitter applies after clamping, so a delay at the cap may
//! come out up to 10% above `max_delay`.

use crate::categorize_error;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Attempt ceiling used by [`should_retry`].
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default first-attempt delay.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Default delay cap.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(30_000);

/// Default growth factor for [`get_backoff_delay`].
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

/// Relative jitter amplitude (±10%).
const JITTER_RATIO: f64 = 0.1;

// ============================================================================
// Classification
// ============================================================================

/// Whether the failure might resolve without intervention.
///
/// `true` for NETWORK, TIMEOUT and RESOURCE; `false` for everything else,
/// including unmapped codes.
#[inline]
pub fn is_recoverable(code: impl Into<i64>) -> bool {
    categorize_error(code).is_recoverable()
}

/// Whether the failure is a candidate for automatic re-execution.
///
/// Only NETWORK and TIMEOUT. RESOURCE is recoverable but not retryable.
#[inline]
pub fn is_retryable(code: impl Into<i64>) -> bool {
    categorize_error(code).is_retryable()
}

/// Retry decision with the default ceiling of [`DEFAULT_MAX_ATTEMPTS`].
///
/// `attempt_count` is the number of attempts already made (zero-indexed).
#[inline]
pub fn should_retry(code: impl Into<i64>, attempt_count: u32) -> bool {
    should_retry_with_limit(code, attempt_count, DEFAULT_MAX_ATTEMPTS)
}

/// Retry decision with an explicit ceiling.
///
/// `false` once `attempt_count >= max_attempts`, otherwise [`is_retryable`].
#[inline]
pub fn should_retry_with_limit(code: impl Into<i64>, attempt_count: u32, max_attempts: u32) -> bool {
    attempt_count < max_attempts && is_retryable(code)
}

/// Advised retry ceiling for a code's category: NETWORK 3, TIMEOUT 2,
/// RESOURCE 5, everything else 0.
///
/// Advisory only; independent of the ceiling passed to
/// [`should_retry_with_limit`].
#[inline]
pub fn get_max_retry_attempts(code: impl Into<i64>) -> u32 {
    categorize_error(code).max_retry_attempts()
}

// ============================================================================
// Delay Options
// ============================================================================

/// Millisecond (de)serialization for `Duration` option fields.
mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Options for [`get_retry_delay`] (doubling backoff).
///
/// Deserializes from `{"baseDelay": 1000, "maxDelay": 30000, "useJitter": true}`
/// with every key optional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetryDelayOptions {
    /// Delay before the first retry
    #[serde(with = "millis")]
    pub base_delay: Duration,
    /// Upper bound applied before jitter
    #[serde(with = "millis")]
    pub max_delay: Duration,
    /// Apply ±10% noise
    pub use_jitter: bool,
}

impl Default for RetryDelayOptions {
    fn default() -> Self {
        Self {
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            use_jitter: true,
        }
    }
}

impl RetryDelayOptions {
    /// Set the base delay.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Set the delay cap.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Enable or disable jitter.
    pub fn with_jitter(mut self, use_jitter: bool) -> Self {
        self.use_jitter = use_jitter;
        self
    }
}

/// Options for [`get_backoff_delay`] (arbitrary growth factor).
///
/// A multiplier of `1.0` gives a constant delay and one below `1.0` a
/// decaying sequence; both are valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackoffOptions {
    /// Delay before the first retry
    #[serde(with = "millis")]
    pub base_delay: Duration,
    /// Growth factor per attempt
    pub multiplier: f64,
    /// Upper bound applied before jitter
    #[serde(with = "millis")]
    pub max_delay: Duration,
    /// Apply ±10% noise
    pub use_jitter: bool,
}

impl Default for BackoffOptions {
    fn default() -> Self {
        Self {
            base_delay: DEFAULT_BASE_DELAY,
            multiplier: DEFAULT_MULTIPLIER,
            max_delay: DEFAULT_MAX_DELAY,
            use_jitter: true,
        }
    }
}

impl BackoffOptions {
    /// Set the base delay.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Set the growth factor.
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Set the delay cap.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Enable or disable jitter.
    pub fn with_jitter(mut self, use_jitter: bool) -> Self {
        self.use_jitter = use_jitter;
        self
    }
}

impl From<RetryDelayOptions> for BackoffOptions {
    fn from(options: RetryDelayOptions) -> Self {
        Self {
            base_delay: options.base_delay,
            multiplier: DEFAULT_MULTIPLIER,
            max_delay: options.max_delay,
            use_jitter: options.use_jitter,
        }
    }
}

// ============================================================================
// Delay Computation
// ============================================================================

/// Doubling backoff: `min(base * 2^attempt, max)`, then optional jitter.
///
/// Uses the thread-local random source. See [`get_retry_delay_with_rng`]
/// for a reproducible variant.
pub fn get_retry_delay(attempt_count: u32, options: &RetryDelayOptions) -> Duration {
    get_backoff_delay(attempt_count, &BackoffOptions::from(*options))
}

/// [`get_retry_delay`] with a caller-supplied random source.
pub fn get_retry_delay_with_rng(
    attempt_count: u32,
    options: &RetryDelayOptions,
    rng: &mut fastrand::Rng,
) -> Duration {
    get_backoff_delay_with_rng(attempt_count, &BackoffOptions::from(*options), rng)
}

/// General backoff: `min(base * multiplier^attempt, max)`, then optional jitter.
///
/// Uses the thread-local random source. See [`get_backoff_delay_with_rng`]
/// for a reproducible variant.
pub fn get_backoff_delay(attempt_count: u32, options: &BackoffOptions) -> Duration {
    compute_delay(attempt_count, options, fastrand::f64)
}

/// [`get_backoff_delay`] with a caller-supplied random source.
pub fn get_backoff_delay_with_rng(
    attempt_count: u32,
    options: &BackoffOptions,
    rng: &mut fastrand::Rng,
) -> Duration {
    compute_delay(attempt_count, options, || rng.f64())
}

/// Retry decision and delay in one call, using the code's advised ceiling.
///
/// Returns `None` when the code should not be retried after
/// `attempt_count` attempts; otherwise the delay to wait first.
///
/// ```rust
/// use keystone_errors::{definitions, next_retry_delay, BackoffOptions};
///
/// let options = BackoffOptions::default().with_jitter(false);
/// assert!(next_retry_delay(definitions::GATEWAY_TIMEOUT, 2, &options).is_some());
/// assert!(next_retry_delay(definitions::GATEWAY_TIMEOUT, 3, &options).is_none());
/// assert!(next_retry_delay(definitions::QUOTA_EXCEEDED, 0, &options).is_none());
/// ```
pub fn next_retry_delay(
    code: impl Into<i64>,
    attempt_count: u32,
    options: &BackoffOptions,
) -> Option<Duration> {
    let code = code.into();
    should_retry_with_limit(code, attempt_count, get_max_retry_attempts(code))
        .then(|| get_backoff_delay(attempt_count, options))
}

fn compute_delay(attempt_count: u32, options: &BackoffOptions, mut sample: impl FnMut() -> f64) -> Duration {
    let base = options.base_delay.as_secs_f64() * 1000.0;
    let cap = options.max_delay.as_secs_f64() * 1000.0;

    // NaN and negative products (odd multipliers) collapse to zero.
    // f64::min would otherwise turn NaN into the cap.
    let grown = base * options.multiplier.powf(f64::from(attempt_count));
    let clamped = if grown.is_nan() { 0.0 } else { grown.min(cap).max(0.0) };

    let millis = if options.use_jitter {
        apply_jitter(clamped, sample())
    } else {
        clamped.floor()
    };

    Duration::from_millis(millis as u64)
}

/// `floor(d + d * 0.1 * (2r - 1))`, kept inside `[0.9 d, 1.1 d]` after flooring.
fn apply_jitter(delay: f64, r: f64) -> f64 {
    let low = (delay * (1.0 - JITTER_RATIO)).ceil();
    let high = (delay * (1.0 + JITTER_RATIO)).floor();
    let jittered = (delay + delay * JITTER_RATIO * (2.0 * r - 1.0)).floor();
    if low > high {
        // Sub-millisecond delays have no integer inside the band.
        return delay.floor();
    }
    jittered.clamp(low, high)
}

//! Retry policies composed at the executor boundary.
//!
//! Two independent policies, never conflated: a bounded-count policy for
//! transient transport failures and a fixed-interval wait policy for
//! server-signaled rate limiting.

use std::time::Duration;

use reqwest::Method;
use tokio_util::sync::CancellationToken;

/// Default total attempts for one logical call, first try included.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Fixed wait applied when the API signals a rate limit.
pub const RATE_LIMIT_WAIT: Duration = Duration::from_millis(5000);

/// Bounded retry for transient transport failures.
///
/// The attempt budget is shared across the whole logical call; it is not
/// reset between retries. Only idempotent verbs are eligible unless the
/// request explicitly opts in.
#[derive(Debug, Clone)]
pub struct TransientRetryPolicy {
    /// Total attempts for one logical call, first try included.
    pub max_attempts: u32,
}

impl Default for TransientRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Fixed-interval wait-and-reissue policy for rate limiting.
///
/// With `auto_wait` enabled the executor absorbs rate-limit errors by
/// sleeping a fixed interval and re-issuing the same request, without an
/// attempt bound - the caller opted into unlimited patience. The loop
/// remains cancellable through `cancel` so it can always be killed.
#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
    /// Whether to absorb rate-limit errors with backoff.
    pub auto_wait: bool,
    /// Fixed interval to wait before re-issuing.
    pub wait: Duration,
    /// Caller-supplied cancellation signal for the backoff loop.
    pub cancel: CancellationToken,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            auto_wait: false,
            wait: RATE_LIMIT_WAIT,
            cancel: CancellationToken::new(),
        }
    }
}

impl RateLimitPolicy {
    /// A policy that absorbs rate limits with the default fixed wait.
    pub fn auto_wait() -> Self {
        Self {
            auto_wait: true,
            ..Self::default()
        }
    }
}

/// Whether a verb is safe to retry after a transport failure.
///
/// A POST that times out may still have taken effect server-side, so only
/// verbs without such effects qualify by default.
pub(crate) fn idempotent(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::DELETE | Method::HEAD)
}

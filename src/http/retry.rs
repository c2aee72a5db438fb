//! Retry decisions and backoff timing for API calls.

use std::time::Duration;

use super::types::Method;
use crate::error::ApiError;

/// Upper bound for a single backoff delay in milliseconds.
pub const MAX_BACKOFF_MS: u64 = 30_000;

/// Delay before retry number `retry` (1-based): `base * 2^(retry - 1)`, capped.
pub fn backoff_delay(base: Duration, retry: usize) -> Duration {
    let exponent = retry.saturating_sub(1).min(31) as u32;
    let delay = base.saturating_mul(1u32 << exponent);
    delay.min(Duration::from_millis(MAX_BACKOFF_MS))
}

/// Whether a failed attempt may be repeated.
///
/// Only transport failures qualify. Non-idempotent methods need the caller's
/// explicit opt-in.
pub fn should_retry(method: Method, retry_non_idempotent: bool, error: &ApiError) -> bool {
    if !error.is_retryable() {
        return false;
    }
    method.is_idempotent() || retry_non_idempotent
}

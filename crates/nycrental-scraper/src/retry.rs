//! Fixed-delay retry for proxied listing fetches.
//!
//! The listing site and proxy throttle aggressively, so the delay between
//! attempts is long and constant rather than exponential. Non-transient
//! errors (see [`FetchError::is_transient`]) are returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::FetchError;

/// Executes `operation`, retrying up to `max_retries` additional times on
/// transient errors with a fixed `delay` between attempts.
///
/// With `max_retries = 1` the operation runs at most twice. A `warn!` record
/// naming the attempt and the triggering error is emitted before each sleep.
/// The sleep is a tokio timer, so dropping the returned future while it is
/// waiting cancels the pending attempt.
pub(crate) async fn retry_fixed_delay<T, F, Fut>(
    max_retries: u32,
    delay: Duration,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let total_attempts = max_retries.saturating_add(1);
    let mut attempt = 1u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_transient() || attempt >= total_attempts {
                    return Err(err);
                }
                tracing::warn!(
                    attempt,
                    total_attempts,
                    delay_secs = delay.as_secs(),
                    error = %err,
                    "fetch attempt failed, retrying after fixed delay"
                );
            }
        }

        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

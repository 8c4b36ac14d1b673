// src/retry.rs
// =============================================================================
// Bounded retry with a fixed backoff per failure kind.
//
// The caller supplies:
// - how many attempts are allowed in total
// - the operation (called with the 1-based attempt number)
// - a classifier that looks at an error and answers either
//   Some(delay) = retryable, wait this long first
//   None        = terminal, give up right away
//
// After the last attempt the error is returned as-is, without sleeping.
// =============================================================================

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

pub async fn with_backoff<T, E, F, Fut, C>(
    max_attempts: u32,
    mut operation: F,
    classify: C,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> Option<Duration>,
    E: Display,
{
    // Zero attempts makes no sense; always try at least once
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let error = match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        let delay = match classify(&error) {
            Some(delay) if attempt < max_attempts => delay,
            _ => return Err(error),
        };

        warn!(
            attempt,
            max_attempts,
            wait_secs = delay.as_secs(),
            error = %error,
            "attempt failed, retrying"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

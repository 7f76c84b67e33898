use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Fixed-delay retry bound. Only errors the caller marks as retryable are retried.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay: Duration::from_millis(delay_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    /// Every attempt failed with a retryable error.
    Exhausted { attempts: u32, last: E },
    /// A non-retryable error stopped the loop early.
    Aborted(E),
}

/// Runs `operation(attempt)` (1-based) until it succeeds, fails with an error
/// `is_retryable` rejects, or the policy runs out of attempts.
pub async fn with_retry_when<T, E, F, Fut, P>(
    policy: RetryPolicy,
    operation_name: &str,
    mut operation: F,
    is_retryable: P,
) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: Display,
{
    let mut attempt = 1;
    loop {
        match operation(attempt).await {
            Ok(result) => {
                if attempt > 1 {
                    debug!("{} succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(result);
            }
            Err(e) if !is_retryable(&e) => return Err(RetryError::Aborted(e)),
            Err(e) => {
                if attempt >= policy.max_attempts {
                    debug!("{} failed after {} attempts", operation_name, attempt);
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        last: e,
                    });
                }

                warn!(
                    "{} failed (attempt {}/{}). Retrying in {:?}: {}",
                    operation_name, attempt, policy.max_attempts, policy.delay, e
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}

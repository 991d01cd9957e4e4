//! Retry policy for transient-unavailable errors
//!
//! Wraps a single remote call. Only `Unavailable` is retried, bounded, with
//! exponential backoff under the same logical deadline. NOT_FOUND,
//! DEADLINE_EXCEEDED, and unclassified errors propagate unchanged on the
//! first occurrence.

use std::future::Future;
use std::time::Duration;

use contracts::{CameraError, Result};
use tracing::warn;

use crate::deadline::Deadline;

/// Maximum attempts per wrapped call (1 initial + 3 retries).
pub const MAX_ATTEMPTS: u32 = 4;

/// First backoff interval; doubles per retry.
const BACKOFF_BASE: Duration = Duration::from_millis(50);

/// Backoff cap.
const BACKOFF_MAX: Duration = Duration::from_secs(1);

/// Run `call`, retrying transient-unavailable failures.
///
/// The wrapped call is responsible for recomputing its own remaining timeout
/// from `deadline` on every attempt. Between attempts, a backoff that would
/// outlive the deadline aborts with `DeadlineExceeded` instead of sleeping:
/// a deadline that expires mid-retry surfaces as a deadline failure, not as
/// the underlying transient error.
pub async fn retry_on_unavailable<T, F, Fut>(
    deadline: Option<&Deadline>,
    operation: &str,
    mut call: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut backoff = BACKOFF_BASE;

    for attempt in 1..=MAX_ATTEMPTS {
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_unavailable() && attempt < MAX_ATTEMPTS => {
                if let Some(deadline) = deadline {
                    if deadline.remaining_or_zero() <= backoff {
                        return Err(CameraError::deadline_exceeded(operation));
                    }
                }

                warn!(
                    operation,
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %e,
                    "camera service unavailable, retrying"
                );

                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(BACKOFF_MAX);
            }
            Err(e) => return Err(e),
        }
    }

    unreachable!("retry loop returns on the last attempt")
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_success_passes_through() {
        let calls = AtomicU32::new(0);
        let result = retry_on_unavailable(None, "op", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(42)
        })
        .await
        .unwrap();

        assert_eq!(result, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_is_retried() {
        let calls = AtomicU32::new(0);
        let result = retry_on_unavailable(None, "op", || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(CameraError::unavailable("restarting"))
            } else {
                Ok("ok")
            }
        })
        .await
        .unwrap();

        assert_eq!(result, "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempts_are_bounded() {
        let calls = AtomicU32::new(0);
        let err = retry_on_unavailable(None, "op", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(CameraError::unavailable("still down"))
        })
        .await
        .unwrap_err();

        assert!(err.is_unavailable());
        assert_eq!(calls.load(Ordering::SeqCst), MAX_ATTEMPTS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_is_never_retried() {
        let calls = AtomicU32::new(0);
        let err = retry_on_unavailable(None, "op", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(CameraError::handle_not_found("gone"))
        })
        .await
        .unwrap_err();

        assert!(err.is_handle_not_found());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_aborts_backoff() {
        // Budget smaller than the first backoff: the transient error is
        // converted into DeadlineExceeded instead of sleeping past the end.
        let deadline = Deadline::after(Duration::from_millis(20));
        let calls = AtomicU32::new(0);

        let err = retry_on_unavailable(Some(&deadline), "capture", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(CameraError::unavailable("still down"))
        })
        .await
        .unwrap_err();

        assert!(err.is_deadline_exceeded());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

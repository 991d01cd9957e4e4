//! Deadline arithmetic
//!
//! One absolute deadline is computed at the top of each logical operation and
//! threaded unchanged through every nested call. Each nested call recomputes
//! its remaining budget; a non-positive remainder fails before the call is
//! issued, even on the very first call.
//!
//! Built on `tokio::time::Instant` so paused-clock tests control it.

use std::time::Duration;

use contracts::{CameraError, Result};
use tokio::time::Instant;

/// Absolute point in time bounding an entire logical operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline(Instant);

impl Deadline {
    /// Deadline at `now + timeout`.
    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now() + timeout)
    }

    /// Deadline at an absolute instant.
    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    /// Effective deadline from caller-supplied parts.
    ///
    /// An explicit deadline takes priority over a timeout; neither means the
    /// operation is unbounded.
    pub fn resolve(timeout: Option<Duration>, deadline: Option<Deadline>) -> Option<Deadline> {
        deadline.or_else(|| timeout.map(Deadline::after))
    }

    /// Remaining budget, or `DeadlineExceeded` if none is left.
    ///
    /// Called immediately before every remote call that carries a deadline.
    pub fn remaining(&self, operation: &str) -> Result<Duration> {
        let remaining = self.0.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(CameraError::deadline_exceeded(operation));
        }
        Ok(remaining)
    }

    /// Remaining budget without failing; zero when expired.
    pub fn remaining_or_zero(&self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }
}

/// Remaining timeout for a nested call under an optional deadline.
///
/// `None` deadline means unbounded; an expired deadline fails fast with
/// `DeadlineExceeded` without contacting the service.
pub fn remaining_timeout(deadline: Option<&Deadline>, operation: &str) -> Result<Option<Duration>> {
    deadline.map(|d| d.remaining(operation)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_deadline_priority_over_timeout() {
        let explicit = Deadline::after(Duration::from_secs(1));
        let resolved = Deadline::resolve(Some(Duration::from_secs(60)), Some(explicit));
        assert_eq!(resolved, Some(explicit));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_from_timeout() {
        let resolved = Deadline::resolve(Some(Duration::from_millis(500)), None);
        assert!(resolved.is_some());
        let remaining = resolved.unwrap().remaining("op").unwrap();
        assert_eq!(remaining, Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_unbounded() {
        assert_eq!(Deadline::resolve(None, None), None);
        assert!(remaining_timeout(None, "op").unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_deadline_fails_fast() {
        let deadline = Deadline::after(Duration::from_millis(10));
        tokio::time::advance(Duration::from_millis(11)).await;

        let err = deadline.remaining("capture").unwrap_err();
        assert!(err.is_deadline_exceeded());
        assert!(err.to_string().contains("capture"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remaining_shrinks() {
        let deadline = Deadline::after(Duration::from_millis(100));
        tokio::time::advance(Duration::from_millis(40)).await;
        assert_eq!(
            deadline.remaining("op").unwrap(),
            Duration::from_millis(60)
        );
        assert_eq!(deadline.remaining_or_zero(), Duration::from_millis(60));
    }
}

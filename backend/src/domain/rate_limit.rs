//! Fixed-window request rate limiting.
//!
//! In-process and best-effort: counters live in a mutex-guarded map keyed by
//! caller-chosen strings (`login:{email}`, `portal-auth:{ip}`) and reset
//! lazily on the first check after a window expires. Nothing is persisted;
//! restarting the process clears all windows. A multi-instance deployment
//! would need a shared store; a known limitation, not a correctness bug.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the caller may proceed.
    pub allowed: bool,
    /// Time until the window resets, present when denied.
    pub retry_after: Option<Duration>,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window counter keyed by an arbitrary string.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use orderflow::domain::rate_limit::FixedWindowLimiter;
///
/// let limiter = FixedWindowLimiter::new();
/// let decision = limiter.check("login:ada@example.com", 5, Duration::from_secs(900));
/// assert!(decision.allowed);
/// ```
#[derive(Debug, Default)]
pub struct FixedWindowLimiter {
    windows: Mutex<HashMap<String, Window>>,
}

impl FixedWindowLimiter {
    /// Create an empty limiter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one attempt against `key` and decide whether it may proceed.
    ///
    /// The first attempt in a window initialises the counter; attempts past
    /// `limit` are denied and report the time remaining until the window
    /// resets.
    pub fn check(&self, key: &str, limit: u32, window: Duration) -> RateLimitDecision {
        self.check_at(Instant::now(), key, limit, window)
    }

    fn check_at(&self, now: Instant, key: &str, limit: u32, window: Duration) -> RateLimitDecision {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let entry = windows
            .entry(key.to_owned())
            .and_modify(|w| {
                if now >= w.reset_at {
                    w.count = 0;
                    w.reset_at = now + window;
                }
            })
            .or_insert(Window {
                count: 0,
                reset_at: now + window,
            });

        entry.count = entry.count.saturating_add(1);
        if entry.count <= limit {
            RateLimitDecision {
                allowed: true,
                retry_after: None,
            }
        } else {
            RateLimitDecision {
                allowed: false,
                retry_after: Some(entry.reset_at.saturating_duration_since(now)),
            }
        }
    }

    /// Drop expired windows to reclaim memory.
    ///
    /// Correctness never depends on this; expired windows also reset lazily
    /// on their next check.
    pub fn sweep(&self) {
        let now = Instant::now();
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, w| now < w.reset_at);
    }
}

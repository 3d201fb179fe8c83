//! Fixed-window request throttling keyed by client identity.
//!
//! [`RateLimiter`] is the seam the HTTP layer talks to; the default
//! [`FixedWindowLimiter`] keeps one counter per key in a [`DashMap`]. The
//! window reset and the increment for a key happen under that key's entry
//! lock, so concurrent requests from one client cannot undercount.
//!
//! State is process-local and is lost on restart.

use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Creation requests allowed per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 30;

/// Length of one window.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Number of tracked keys above which expired windows are swept on the next
/// check.
const SWEEP_THRESHOLD: usize = 4096;

/// Outcome of a [`RateLimiter::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// Request counted; `remaining` more are allowed in the current window.
    Allowed { remaining: u32 },
    /// Window exhausted; the key is admitted again after `retry_after`.
    Limited { retry_after: Duration },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }
}

/// Request-throttling gate.
pub trait RateLimiter: Send + Sync + 'static {
    /// Count one request for `key` and decide whether it may proceed.
    fn check(&self, key: &str) -> RateDecision;

    /// Maximum requests per window.
    fn limit(&self) -> u32;

    /// Window length.
    fn window(&self) -> Duration;
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// In-memory fixed-window limiter.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    windows: DashMap<String, Window>,
    max_requests: u32,
    window: Duration,
}

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window,
        }
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }

    /// Drop every window that has expired at `now`.
    pub fn sweep(&self, now: Instant) {
        let window = self.window;
        self.windows
            .retain(|_, w| now.saturating_duration_since(w.started) < window);
    }

    fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        if self.windows.len() >= SWEEP_THRESHOLD {
            self.sweep(now);
        }

        let mut entry = self
            .windows
            .entry(key.to_owned())
            .or_insert(Window {
                started: now,
                count: 0,
            });

        let elapsed = now.saturating_duration_since(entry.started);
        if elapsed >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        if entry.count < self.max_requests {
            entry.count += 1;
            RateDecision::Allowed {
                remaining: self.max_requests - entry.count,
            }
        } else {
            let elapsed = now.saturating_duration_since(entry.started);
            RateDecision::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            }
        }
    }
}

impl RateLimiter for FixedWindowLimiter {
    fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    fn limit(&self) -> u32 {
        self.max_requests
    }

    fn window(&self) -> Duration {
        self.window
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn thirty_first_request_is_limited() {
        let limiter = FixedWindowLimiter::default();
        let now = Instant::now();
        for i in 1..=30 {
            assert_eq!(
                limiter.check_at("10.0.0.1", now),
                RateDecision::Allowed { remaining: 30 - i },
                "request {i}"
            );
        }
        assert!(!limiter.check_at("10.0.0.1", now).is_allowed());
    }

    #[test]
    fn keys_are_independent() {
        let limiter = FixedWindowLimiter::new(1, DEFAULT_WINDOW);
        let now = Instant::now();
        assert!(limiter.check_at("a", now).is_allowed());
        assert!(!limiter.check_at("a", now).is_allowed());
        assert!(limiter.check_at("b", now).is_allowed());
    }

    #[test]
    fn retry_after_counts_down_to_window_end() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_secs(900));
        let start = Instant::now();
        limiter.check_at("k", start);
        let decision = limiter.check_at("k", start + Duration::from_secs(600));
        assert_eq!(
            decision,
            RateDecision::Limited {
                retry_after: Duration::from_secs(300)
            }
        );
    }

    #[test]
    fn new_window_resets_the_count() {
        let limiter = FixedWindowLimiter::new(2, Duration::from_secs(60));
        let start = Instant::now();
        limiter.check_at("k", start);
        limiter.check_at("k", start);
        assert!(!limiter.check_at("k", start + Duration::from_secs(59)).is_allowed());
        assert_eq!(
            limiter.check_at("k", start + Duration::from_secs(60)),
            RateDecision::Allowed { remaining: 1 }
        );
    }

    #[test]
    fn sweep_drops_expired_windows_only() {
        let limiter = FixedWindowLimiter::new(5, Duration::from_secs(60));
        let start = Instant::now();
        limiter.check_at("old", start);
        limiter.check_at("fresh", start + Duration::from_secs(30));
        limiter.sweep(start + Duration::from_secs(61));
        assert_eq!(limiter.tracked_keys(), 1);
    }

    #[test]
    fn zero_limit_rejects_everything() {
        let limiter = FixedWindowLimiter::new(0, Duration::from_secs(10));
        assert!(!limiter.check("k").is_allowed());
    }

    #[test]
    fn concurrent_checks_never_exceed_the_limit() {
        let limiter = Arc::new(FixedWindowLimiter::new(30, DEFAULT_WINDOW));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || {
                    (0..20).filter(|_| limiter.check("shared").is_allowed()).count()
                })
            })
            .collect();
        let allowed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(allowed, 30);
    }
}

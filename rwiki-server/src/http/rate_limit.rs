//! In-process fixed-window rate limiting.
//!
//! Counters live in a DashMap keyed by (scope, client address); a
//! window resets when its start slides out of range. State is lost on
//! restart, which is acceptable for abuse throttling on a small site.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use dashmap::DashMap;

/// One sweep of expired windows per this many hits.
const SWEEP_EVERY: u64 = 1024;

/// What is being throttled. Each scope carries its own budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Login attempts: 5 per minute.
    Login,
    /// Public form submissions: 5 per hour.
    Submit,
    /// Search requests: 30 per minute.
    Search,
}

impl Scope {
    fn budget(self) -> (u32, u64) {
        match self {
            Self::Login => (5, 60),
            Self::Submit => (5, 3600),
            Self::Search => (30, 60),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    start: u64,
    count: u32,
}

/// Fixed-window limiter shared through AppState.
#[derive(Debug)]
pub struct RateLimiter {
    disabled: bool,
    windows: DashMap<(Scope, String), Window>,
    hits: AtomicU64,
}

impl RateLimiter {
    pub fn new(disabled: bool) -> Self {
        if disabled {
            tracing::warn!("rate limiting disabled");
        }
        Self {
            disabled,
            windows: DashMap::new(),
            hits: AtomicU64::new(0),
        }
    }

    /// Record one hit and report whether it is within budget.
    pub fn allow(&self, scope: Scope, client: &str) -> bool {
        self.allow_at(scope, client, now_unix())
    }

    fn allow_at(&self, scope: Scope, client: &str, now: u64) -> bool {
        if self.disabled {
            return true;
        }
        let (max, window_secs) = scope.budget();
        let mut entry = self
            .windows
            .entry((scope, client.to_string()))
            .or_insert(Window { start: now, count: 0 });
        if now.saturating_sub(entry.start) >= window_secs {
            entry.start = now;
            entry.count = 0;
        }
        entry.count += 1;
        let allowed = entry.count <= max;
        if !allowed {
            tracing::warn!(?scope, client, count = entry.count, "rate limit exceeded");
        }
        // the entry guard holds a shard lock that sweep_at would contend on
        drop(entry);

        if self.hits.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == SWEEP_EVERY - 1 {
            self.sweep_at(now);
        }
        allowed
    }

    /// Drop windows that expired, to keep the map from growing without
    /// bound on long uptimes. Runs every [`SWEEP_EVERY`] hits.
    fn sweep_at(&self, now: u64) {
        self.windows
            .retain(|(scope, _), window| now.saturating_sub(window.start) < scope.budget().1);
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_enforced_per_scope_and_client() {
        let limiter = RateLimiter::new(false);
        for _ in 0..5 {
            assert!(limiter.allow_at(Scope::Login, "1.2.3.4", 1000));
        }
        assert!(!limiter.allow_at(Scope::Login, "1.2.3.4", 1000));
        // other client and other scope still have budget
        assert!(limiter.allow_at(Scope::Login, "5.6.7.8", 1000));
        assert!(limiter.allow_at(Scope::Submit, "1.2.3.4", 1000));
    }

    #[test]
    fn window_resets_after_expiry() {
        let limiter = RateLimiter::new(false);
        for _ in 0..6 {
            limiter.allow_at(Scope::Login, "1.2.3.4", 1000);
        }
        assert!(!limiter.allow_at(Scope::Login, "1.2.3.4", 1059));
        assert!(limiter.allow_at(Scope::Login, "1.2.3.4", 1060));
    }

    #[test]
    fn expired_windows_are_swept_out() {
        let limiter = RateLimiter::new(false);
        limiter.allow_at(Scope::Login, "1.2.3.4", 1000);
        limiter.allow_at(Scope::Submit, "1.2.3.4", 1000);

        // enough hits later to trigger a sweep; the Login window has
        // expired by then, the hour-long Submit window has not
        for _ in 0..SWEEP_EVERY {
            limiter.allow_at(Scope::Search, "5.6.7.8", 2000);
        }
        assert!(!limiter.windows.contains_key(&(Scope::Login, "1.2.3.4".into())));
        assert!(limiter.windows.contains_key(&(Scope::Submit, "1.2.3.4".into())));
    }

    #[test]
    fn disabled_limiter_always_allows() {
        let limiter = RateLimiter::new(true);
        for _ in 0..100 {
            assert!(limiter.allow_at(Scope::Login, "1.2.3.4", 1000));
        }
    }
}

//! Fixed-window rate limiting keyed by user id.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window counter. Each key gets `max_requests` per window;
/// expired windows are pruned on every check so the map never grows
/// with dead keys.
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn per_minute(max_requests: u32) -> Self {
        Self::new(max_requests, Duration::from_secs(60))
    }

    /// Record one request for `key`. Returns false when the key has
    /// exhausted its window.
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        windows.retain(|_, w| now.duration_since(w.started) < self.window);

        let window = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if window.count >= self.max_requests {
            return false;
        }
        window.count += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_the_limit_then_blocks() {
        let limiter = RateLimiter::per_minute(3);
        assert!(limiter.check("u1"));
        assert!(limiter.check("u1"));
        assert!(limiter.check("u1"));
        assert!(!limiter.check("u1"));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = RateLimiter::per_minute(1);
        assert!(limiter.check("u1"));
        assert!(!limiter.check("u1"));
        assert!(limiter.check("u2"));
    }

    #[test]
    fn expired_windows_are_pruned() {
        let limiter = RateLimiter::new(1, Duration::from_millis(10));
        assert!(limiter.check("u1"));
        assert!(!limiter.check("u1"));
        std::thread::sleep(Duration::from_millis(20));
        assert!(limiter.check("u1"));
        // The old window was dropped, not just reset.
        assert_eq!(limiter.windows.lock().unwrap().len(), 1);
    }
}

//! Per-client sliding window rate limiting

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Returned when a client exceeded its window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimited {
    pub retry_after: Duration,
}

impl std::fmt::Display for RateLimited {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rate limited, retry after {:?}", self.retry_after)
    }
}

impl std::error::Error for RateLimited {}

/// Rate limiter keyed by client address
pub struct RateLimiter {
    requests: Mutex<HashMap<String, Vec<Instant>>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    pub fn check(&self, key: &str) -> Result<(), RateLimited> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), RateLimited> {
        // A poisoned map only holds timestamps, so keep using it
        let mut requests = self.requests.lock().unwrap_or_else(|e| e.into_inner());

        // Get or create entry
        let times = requests.entry(key.to_string()).or_default();

        // Remove old requests outside the window
        times.retain(|&t| now.duration_since(t) < self.window);

        // Check limit
        if times.len() >= self.max_requests as usize {
            let retry_after = times.first()
                .map(|t| self.window.saturating_sub(now.duration_since(*t)))
                .unwrap_or(self.window);

            return Err(RateLimited { retry_after });
        }

        // Add current request
        times.push(now);
        Ok(())
    }

    /// Drop clients with no requests inside the window
    pub fn prune(&self) {
        self.prune_at(Instant::now());
    }

    fn prune_at(&self, now: Instant) {
        let mut requests = self.requests.lock().unwrap_or_else(|e| e.into_inner());
        requests.retain(|_, times| times.iter().any(|&t| now.duration_since(t) < self.window));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = RateLimiter::new(3, 60);
        let now = Instant::now();
        for _ in 0..3 {
            assert!(limiter.check_at("10.0.0.1", now).is_ok());
        }
        let err = limiter.check_at("10.0.0.1", now).unwrap_err();
        assert_eq!(err.retry_after, Duration::from_secs(60));
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = RateLimiter::new(1, 60);
        assert!(limiter.check("a").is_ok());
        assert!(limiter.check("a").is_err());
        assert!(limiter.check("b").is_ok());
    }

    fn tracked(limiter: &RateLimiter) -> Vec<String> {
        let requests = limiter.requests.lock().unwrap();
        let mut keys: Vec<String> = requests.keys().cloned().collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_prune_drops_idle_clients() {
        let limiter = RateLimiter::new(5, 10);
        let start = Instant::now();
        assert!(limiter.check_at("idle", start).is_ok());
        assert!(limiter.check_at("busy", start).is_ok());
        assert!(limiter.check_at("busy", start + Duration::from_secs(8)).is_ok());

        limiter.prune_at(start + Duration::from_secs(12));

        assert_eq!(tracked(&limiter), vec!["busy".to_string()]);
    }

    #[test]
    fn test_prune_keeps_clients_inside_window() {
        let limiter = RateLimiter::new(1, 10);
        let start = Instant::now();
        assert!(limiter.check_at("a", start).is_ok());

        limiter.prune_at(start + Duration::from_secs(9));

        assert_eq!(tracked(&limiter), vec!["a".to_string()]);
        // The surviving entry still counts against the limit
        assert!(limiter.check_at("a", start + Duration::from_secs(9)).is_err());
    }

    #[test]
    fn test_window_slides() {
        let limiter = RateLimiter::new(1, 10);
        let start = Instant::now();
        assert!(limiter.check_at("a", start).is_ok());
        assert!(limiter.check_at("a", start + Duration::from_secs(5)).is_err());
        assert!(limiter.check_at("a", start + Duration::from_secs(10)).is_ok());
    }
}

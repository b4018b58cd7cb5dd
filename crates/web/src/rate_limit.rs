//! Per-client sliding-window rate limiting for `/api/*`.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::config::RateLimitConfig;
use crate::error::ApiError;
use crate::server::AppState;

/// Sliding-window limiter keyed by client address
pub struct RateLimiter {
    windows: HashMap<String, Vec<Instant>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: HashMap::new(),
            max_requests: max_requests as usize,
            window,
        }
    }

    pub fn from_config(cfg: &RateLimitConfig) -> Self {
        Self::new(cfg.max_requests, Duration::from_secs(cfg.window_secs))
    }

    /// Record a request for `key`. Returns `Err(retry_after_secs)` when the
    /// window is full.
    pub fn check(&mut self, key: &str) -> Result<(), u64> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&mut self, key: &str, now: Instant) -> Result<(), u64> {
        let window = self.window;
        let entries = self.windows.entry(key.to_string()).or_default();
        entries.retain(|ts| now.duration_since(*ts) < window);

        if entries.len() >= self.max_requests {
            let oldest = entries.first().copied().unwrap_or(now);
            let wait = window.saturating_sub(now.duration_since(oldest));
            // round up so clients never retry a moment too early
            let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
            return Err(secs.max(1));
        }

        entries.push(now);
        Ok(())
    }

    /// Drop keys whose window has fully expired.
    pub fn prune(&mut self) {
        let now = Instant::now();
        let window = self.window;
        self.windows
            .retain(|_, entries| entries.iter().any(|ts| now.duration_since(*ts) < window));
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

/// Client key: the socket peer IP, or `unknown` when the server was not
/// started with connect info (in-process tests).
fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rate-limit every `/api/*` request. Returns 429 if exceeded.
pub async fn limit(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    if !state.config.rate_limit.enabled || !request.uri().path().starts_with("/api/") {
        return next.run(request).await;
    }

    let key = client_key(&request);
    let verdict = {
        let mut limiter = state.limiter.lock();
        if limiter.tracked_clients() > 10_000 {
            limiter.prune();
        }
        limiter.check(&key)
    };

    match verdict {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            warn!("Rate limit exceeded for {}", key);
            ApiError::RateLimited { retry_after }.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let mut limiter = RateLimiter::new(3, Duration::from_secs(60));
        let now = Instant::now();
        for _ in 0..3 {
            assert!(limiter.check_at("1.2.3.4", now).is_ok());
        }
        let retry = limiter.check_at("1.2.3.4", now).unwrap_err();
        assert_eq!(retry, 60);
        // other clients have their own window
        assert!(limiter.check_at("5.6.7.8", now).is_ok());
    }

    #[test]
    fn test_window_slides() {
        let mut limiter = RateLimiter::new(2, Duration::from_secs(10));
        let start = Instant::now();
        limiter.check_at("k", start).unwrap();
        limiter.check_at("k", start + Duration::from_secs(4)).unwrap();
        assert_eq!(
            limiter.check_at("k", start + Duration::from_secs(6)),
            Err(4)
        );
        // first request has aged out
        assert!(limiter.check_at("k", start + Duration::from_secs(10)).is_ok());
    }

    #[test]
    fn test_rejected_requests_do_not_extend_window() {
        let mut limiter = RateLimiter::new(1, Duration::from_secs(10));
        let start = Instant::now();
        limiter.check_at("k", start).unwrap();
        for s in 1..5 {
            assert!(limiter.check_at("k", start + Duration::from_secs(s)).is_err());
        }
        assert!(limiter.check_at("k", start + Duration::from_secs(10)).is_ok());
    }
}

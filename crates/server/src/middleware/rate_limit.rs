use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{extract::{Request, State}, http::StatusCode, middleware::Next, response::Response};
use dashmap::DashMap;
use tracing::warn;

use crate::errors::JsonApiError;
use crate::middleware::client_ip::ClientIp;

// Opportunistic cleanup once the window map holds this many IPs.
const PRUNE_THRESHOLD: usize = 4096;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// In-memory fixed-window request counter keyed by client IP.
///
/// Counters live in the process; restarts reset them and multiple replicas
/// do not share state.
#[derive(Clone)]
pub struct FixedWindowLimiter {
    max_requests: u32,
    window: Duration,
    hits: Arc<DashMap<IpAddr, Window>>,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            hits: Arc::new(DashMap::new()),
        }
    }

    pub fn from_config(cfg: &configs::RateLimitConfig) -> Self {
        Self::new(cfg.max_requests, Duration::from_secs(cfg.window_secs))
    }

    /// Count a hit for `ip`; `false` once the window's budget is spent.
    pub fn check(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut entry = self.hits.entry(ip).or_insert(Window { started: now, count: 0 });
        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }
        entry.count += 1;
        let allowed = entry.count <= self.max_requests;
        drop(entry);

        if self.hits.len() > PRUNE_THRESHOLD {
            self.prune(now);
        }
        allowed
    }

    fn prune(&self, now: Instant) {
        let window = self.window;
        self.hits.retain(|_, w| now.duration_since(w.started) < window);
    }
}

/// Reject requests over the per-IP budget with 429.
pub async fn limit_by_ip(
    State(limiter): State<FixedWindowLimiter>,
    req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let ip = req
        .extensions()
        .get::<ClientIp>()
        .map(|c| c.0)
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    if !limiter.check(ip) {
        warn!(%ip, path = %req.uri().path(), "rate limit exceeded");
        return Err(JsonApiError::new(
            StatusCode::TOO_MANY_REQUESTS,
            "Too Many Requests",
            Some("rate limit exceeded, retry later".into()),
        ));
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[test]
    fn sixth_request_in_window_rejected() {
        let limiter = FixedWindowLimiter::new(5, Duration::from_secs(60));
        for _ in 0..5 {
            assert!(limiter.check(ip(1)));
        }
        assert!(!limiter.check(ip(1)));
    }

    #[test]
    fn ips_are_counted_independently() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check(ip(1)));
        assert!(!limiter.check(ip(1)));
        assert!(limiter.check(ip(2)));
    }

    #[test]
    fn window_expiry_resets_the_counter() {
        let limiter = FixedWindowLimiter::new(2, Duration::from_millis(20));
        assert!(limiter.check(ip(3)));
        assert!(limiter.check(ip(3)));
        assert!(!limiter.check(ip(3)));
        std::thread::sleep(Duration::from_millis(25));
        assert!(limiter.check(ip(3)));
    }
}

//! Per-client rate limiting middleware.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::config::SecurityConfig;
use crate::http::middleware::client_ip::ClientIp;

/// A simple token bucket.
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64) -> Self {
        Self {
            tokens: capacity,
            last_update: Instant::now(),
        }
    }

    fn try_acquire(&mut self, capacity: f64, refill_rate: f64) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Bucket count above which idle entries are swept before inserting.
const SWEEP_THRESHOLD: usize = 1024;

/// Shared state for the rate limiter, keyed by resolved client IP.
pub struct RateLimiterState {
    buckets: Mutex<HashMap<IpAddr, TokenBucket>>,
    burst: f64,
    refill_rate: f64,
    idle_ttl: Duration,
}

impl RateLimiterState {
    pub fn new(config: &SecurityConfig) -> Self {
        let burst = f64::from(config.rate_limit_burst);
        Self {
            buckets: Mutex::new(HashMap::new()),
            burst,
            refill_rate: burst / config.rate_limit_per.as_secs_f64(),
            // A bucket idle for a full refill window is indistinguishable
            // from a fresh one, so dropping it loses nothing.
            idle_ttl: config.rate_limit_per,
        }
    }

    fn check(&self, client: IpAddr) -> bool {
        let mut buckets = self.buckets.lock().expect("rate limiter mutex poisoned");
        if buckets.len() >= SWEEP_THRESHOLD && !buckets.contains_key(&client) {
            let now = Instant::now();
            let ttl = self.idle_ttl;
            buckets.retain(|_, bucket| now.duration_since(bucket.last_update) < ttl);
        }
        let bucket = buckets
            .entry(client)
            .or_insert_with(|| TokenBucket::new(self.burst));
        bucket.try_acquire(self.burst, self.refill_rate)
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.buckets.lock().expect("rate limiter mutex poisoned").len()
    }
}

/// Middleware enforcing the per-client limit. Requests without a resolved
/// client IP (never the case behind the client-ip layer) are keyed together.
pub async fn rate_limit_middleware(
    State(state): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = request
        .extensions()
        .get::<ClientIp>()
        .map(|ip| ip.0)
        .unwrap_or(IpAddr::from([0, 0, 0, 0]));

    if state.check(client) {
        next.run(request).await
    } else {
        tracing::warn!(client = %client, "rate limit exceeded");
        let mut response = Response::new(Body::from("Rate limit exceeded"));
        *response.status_mut() = StatusCode::TOO_MANY_REQUESTS;
        response
    }
}

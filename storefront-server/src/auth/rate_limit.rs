//! Per-IP fixed-window limits for sign-in, order submission and the
//! notification receiver

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use dashmap::DashMap;
use tokio::time::Instant;

use crate::AppError;
use crate::core::ServerState;
use crate::security_log;

/// Budget of one route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub route: &'static str,
    pub max_requests: u32,
    pub window: Duration,
}

/// Sign-in: 5 per minute per IP
pub const LOGIN: Limit = Limit {
    route: "login",
    max_requests: 5,
    window: Duration::from_secs(60),
};

/// Order submission: 10 per minute per IP
pub const ORDERS: Limit = Limit {
    route: "orders",
    max_requests: 10,
    window: Duration::from_secs(60),
};

/// Notification receiver: 60 per minute per IP
pub const NOTIFY: Limit = Limit {
    route: "notify",
    max_requests: 60,
    window: Duration::from_secs(60),
};

/// Entries idle this long are dropped by [`RateLimiter::cleanup`]
const IDLE_AFTER: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    used: u32,
}

#[derive(Debug, Clone, Default)]
pub struct RateLimiter {
    windows: Arc<DashMap<(&'static str, String), Window>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one request from `ip`; `false` once the budget is spent
    pub fn check(&self, limit: &Limit, ip: &str) -> bool {
        let now = Instant::now();
        let mut window = self
            .windows
            .entry((limit.route, ip.to_owned()))
            .or_insert(Window {
                started: now,
                used: 0,
            });

        if now.duration_since(window.started) >= limit.window {
            *window = Window {
                started: now,
                used: 0,
            };
        }
        window.used = window.used.saturating_add(1);
        window.used <= limit.max_requests
    }

    /// Drop idle entries, returns how many were removed
    pub fn cleanup(&self) -> usize {
        let before = self.windows.len();
        let now = Instant::now();
        self.windows
            .retain(|_, window| now.duration_since(window.started) < IDLE_AFTER);
        before - self.windows.len()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// Client IP: first `X-Forwarded-For` hop, then the peer address
pub fn extract_ip(request: &Request) -> String {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());
    if let Some(ip) = forwarded {
        return ip.to_owned();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

fn enforce(state: &ServerState, limit: &Limit, request: &Request) -> Result<(), AppError> {
    let ip = extract_ip(request);
    if state.rate_limiter.check(limit, &ip) {
        return Ok(());
    }
    security_log!("WARN", "rate_limited", route = limit.route, ip = ip);
    Err(AppError::too_many_requests())
}

pub async fn login_rate_limit(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    enforce(&state, &LOGIN, &request)?;
    Ok(next.run(request).await)
}

pub async fn order_rate_limit(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    enforce(&state, &ORDERS, &request)?;
    Ok(next.run(request).await)
}

pub async fn notify_rate_limit(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    enforce(&state, &NOTIFY, &request)?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    const TIGHT: Limit = Limit {
        route: "test",
        max_requests: 1,
        window: Duration::from_secs(60),
    };

    #[tokio::test]
    async fn budget_is_per_ip_and_route() {
        let limiter = RateLimiter::new();
        for _ in 0..LOGIN.max_requests {
            assert!(limiter.check(&LOGIN, "198.51.100.1"));
        }
        assert!(!limiter.check(&LOGIN, "198.51.100.1"));

        assert!(limiter.check(&LOGIN, "198.51.100.2"));
        assert!(limiter.check(&ORDERS, "198.51.100.1"));
    }

    #[tokio::test(start_paused = true)]
    async fn window_resets() {
        let limiter = RateLimiter::new();
        assert!(limiter.check(&TIGHT, "ip"));
        assert!(!limiter.check(&TIGHT, "ip"));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(limiter.check(&TIGHT, "ip"));
    }

    #[tokio::test(start_paused = true)]
    async fn cleanup_drops_idle_entries() {
        let limiter = RateLimiter::new();
        limiter.check(&TIGHT, "a");
        tokio::time::advance(Duration::from_secs(200)).await;
        limiter.check(&TIGHT, "b");
        tokio::time::advance(Duration::from_secs(101)).await;

        assert_eq!(limiter.cleanup(), 1);
        assert_eq!(limiter.len(), 1);
    }

    #[test]
    fn forwarded_for_wins() {
        let req = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_ip(&req), "203.0.113.7");

        let bare = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(extract_ip(&bare), "unknown");
    }
}

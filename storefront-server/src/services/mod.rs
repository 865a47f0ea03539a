//! Router assembly and outbound services
//!
//! - [`build_app`] - full application router with middleware and state
//! - [`Notifier`] - order notification webhook
//! - [`PixelClient`] - analytics pixel events

pub mod analytics;
pub mod notify;

pub use analytics::{PixelClient, PixelEvent};
pub use notify::{Notifier, OrderNotification};

use std::time::Duration;

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::core::ServerState;
use crate::core::config::MAX_BODY_BYTES;

/// Access log: `method uri status`
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// All routes, without global middleware or state
pub fn build_router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        // Public
        .merge(api::health::router())
        .merge(api::product::router())
        .merge(api::orders::router(state))
        // Sign-in (login public, rest authenticated)
        .merge(api::auth::router(state))
        // Admin dashboard
        .merge(api::admin::router(state))
}

/// Fully configured application, used by the server and by tests
pub fn build_app(state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    build_router(&state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

//! Health check
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /health | GET | none |

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// ok | degraded
    status: &'static str,
    version: &'static str,
    environment: String,
    /// Whether the order store answered
    store: bool,
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let store = match state.orders.count() {
        Ok(_) => true,
        Err(e) => {
            tracing::error!(error = %e, "Health check: order store unavailable");
            false
        }
    };

    Json(HealthResponse {
        status: if store { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        store,
    })
}

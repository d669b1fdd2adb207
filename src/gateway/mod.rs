//! HTTP gateway (Axum) for health, reload and detect.
//!
//! Routes:
//! - `GET /` reports liveness and the enrolled face count.
//! - `GET|POST /reload` rebuilds the enrollment snapshot and waits for it.
//! - `POST /detect` matches every face in an uploaded image.

#![allow(missing_docs)]

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;

#[cfg(test)]
mod handler_tests;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::GatewayError;
pub use handler::{detect_handler, health_handler, reload_handler};
pub use state::HandlerState;

pub const VISAGE_STATUS_HEADER: &str = "X-Visage-Status";
pub const VISAGE_STATUS_HEALTHY: &str = "healthy";
pub const VISAGE_STATUS_RELOADED: &str = "reloaded";
/// Reload failed; the previous snapshot is still served.
pub const VISAGE_STATUS_STALE: &str = "stale";
pub const VISAGE_STATUS_DETECTED: &str = "detected";

pub fn create_router_with_state(state: HandlerState) -> Router {
    let max_upload_bytes = state.max_upload_bytes;

    Router::new()
        .route("/", get(health_handler))
        .route("/reload", get(reload_handler).post(reload_handler))
        .route("/detect", post(detect_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

//! airq Service Library
//!
//! HTTP handlers, router and types for the air quality service.
//! This library is used by both the airq-service binary and integration tests.

pub mod handlers;

use std::sync::Arc;

use airq::AqicnClient;
use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

/// Application state shared across handlers.
pub struct AppState {
    /// Upstream feed client.
    pub client: AqicnClient,
}

/// Build the service router.
///
/// Every path or method outside the table below answers with the standard
/// Not Found body:
///
/// - `GET /` - service status
/// - `GET /air-quality?lat=X&lon=Y` - current air quality at coordinates
///
/// Paths match exactly: `/air-quality/` and `/Air-Quality` are not routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root).fallback(handlers::not_found))
        .route(
            "/air-quality",
            get(handlers::get_air_quality).fallback(handlers::not_found),
        )
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(handlers::handle_panic)),
        )
        .with_state(state)
}

// Re-export commonly used types for convenience
pub use handlers::{AirQualityQuery, ApiError, ErrorResponse, StatusResponse};

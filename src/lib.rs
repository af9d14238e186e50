//! Sweepstar booking frontend.
//!
//! Serves the service catalog, computes booking estimates and forwards
//! validated bookings to the remote booking API.

pub mod api;
pub mod booking;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::api::BookingApi;
use crate::booking::MultiplierPolicy;
use crate::cache::AppCache;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub api: BookingApi,
    pub cache: AppCache,
    pub policy: MultiplierPolicy,
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::catalog::list))
        .route("/services/:id", get(routes::catalog::detail))
        .route("/health", get(routes::health))
        .nest("/api/booking", booking::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

//! HTTP surface
//!
//! `GET /` renders the dashboard, `GET /loadMoreAlerts` serves one bucket
//! as JSON, and `/static/` passes through to files on disk. Handlers never
//! return an error status for store failures; they render what they have.

pub mod handlers;
pub mod render;
pub mod state;

use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub use state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/loadMoreAlerts", get(handlers::load_more_alerts))
        .route("/health", get(handlers::healthcheck))
        .nest_service("/static", static_files)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

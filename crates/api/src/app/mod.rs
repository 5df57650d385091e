//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: repository wiring and the customer orchestration service
//! - `routes/`: HTTP routes + handlers
//! - `errors.rs`: problem-document error responses

use std::sync::Arc;

use axum::{middleware::from_fn, routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .fallback(routes::system::fallback)
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(middleware::request_logging))
                .layer(from_fn(middleware::error_handler)),
        )
}

//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store wiring and the blocking-pool bridge for advice jobs
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: services::AppServices) -> Router {
    let services = Arc::new(services);
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::router().layer(
        ServiceBuilder::new()
            .layer(cors)
            .layer(axum::middleware::from_fn(middleware::request_log))
            .layer(Extension(services)),
    )
}

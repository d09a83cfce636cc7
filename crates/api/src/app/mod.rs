//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store wiring (in-memory or Postgres, per configuration)
//! - `routes/`: the route table and the generic resource handlers
//! - `dto.rs`: the response envelope
//! - `errors.rs`: failure responses and their messages

use axum::{routing::get, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: services::AppServices, api_prefix: &str) -> Router {
    let table = routes::route_table(&services, api_prefix);
    for entry in table.entries() {
        tracing::debug!(
            method = %entry.method,
            path = %entry.path,
            operation = entry.operation.name(),
            "route registered"
        );
    }

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(table.into_router())
        .fallback(routes::system::not_found)
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::log_requests)))
}

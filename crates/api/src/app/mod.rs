//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `routes/`: HTTP handlers, one file per area, named after the operations
//! - `dto.rs`: request argument shapes and id parsing
//! - `errors.rs`: consistent error responses
//! - `extract.rs`: body extractors that reject with those responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use unshift_infra::Services;

use crate::config::Config;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod extract;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &Config) -> Router {
    let services = Arc::new(Services::in_memory(config.jwt()));
    let auth_state = middleware::AuthState {
        jwt: Arc::new(config.jwt()),
    };

    // Protected routes: require a verified bearer token.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    routes::public_router()
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}

//! HTTP API application wiring (Axum router + service wiring).
//!
//! This folder is structured like:
//! - `services.rs`: stores, hub and token service wiring
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs and their validation
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use pedalshare_infra::AppConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let (services, jwt) = services::build_services(config);
    let auth_state = middleware::AuthState { jwt };

    let cors = cors_layer(&config.cors_origin)?;

    // Protected routes: require a valid bearer token.
    let protected = routes::protected_router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Ok(routes::public_router()
        .merge(protected)
        .layer(Extension(Arc::new(services)))
        .layer(ServiceBuilder::new().layer(cors)))
}

fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .with_context(|| format!("CORS_ORIGIN is not a valid header value: {origin}"))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

use axum::{
    Router,
    routing::{get, post},
};

pub mod accounts;
pub mod bikes;
pub mod system;
pub mod ws;

/// Endpoints reachable without a token.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/api/bikes", get(bikes::all_bikes))
        .route("/api/bikes/available", get(bikes::available_bikes))
        .route("/api/login", post(accounts::login))
        .route("/api/register", post(accounts::register))
        .route("/ws", get(ws::snapshot_feed))
}

/// Endpoints that act on behalf of the authenticated caller.
pub fn protected_router() -> Router {
    Router::new()
        .route("/api/list-bike", post(bikes::list_bike))
        .route("/api/book", post(bikes::book_bike))
        .route("/api/return", post(bikes::return_bike))
        .route("/api/remove-bike", post(bikes::remove_bike))
        .route("/api/my-bikes", get(bikes::my_bikes))
}

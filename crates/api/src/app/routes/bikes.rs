use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use pedalshare_inventory::Asset;

use crate::app::dto;
use crate::app::errors::{self, ApiError};
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

// -------------------------
// Queries
// -------------------------

/// GET /api/bikes
pub async fn all_bikes(Extension(services): Extension<Arc<AppServices>>) -> Json<Vec<Asset>> {
    Json(services.coordinator.all_assets())
}

/// GET /api/bikes/available
pub async fn available_bikes(
    Extension(services): Extension<Arc<AppServices>>,
) -> Json<Vec<Asset>> {
    Json(services.coordinator.available_assets())
}

/// GET /api/my-bikes
pub async fn my_bikes(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Json<Vec<Asset>> {
    Json(services.coordinator.assets_owned_by(principal.username()))
}

// -------------------------
// Commands
// -------------------------

/// POST /api/list-bike
///
/// The owner is always the caller; an `owner` field in the body is ignored.
pub async fn list_bike(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    payload: Result<Json<dto::ListBikeRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload?;
    let spec = body.into_spec()?;

    let asset = services
        .coordinator
        .list_asset(principal.username().clone(), spec);

    Ok((StatusCode::CREATED, Json(asset)).into_response())
}

/// POST /api/book
pub async fn book_bike(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    payload: Result<Json<dto::BikeIdRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload?;

    if !services.coordinator.book(body.bike_id, principal.username()) {
        return Err(ApiError::bad_request("Bike not available or not found."));
    }
    Ok(errors::json_ok(StatusCode::OK, "Bike booked successfully!"))
}

/// POST /api/return
pub async fn return_bike(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    payload: Result<Json<dto::BikeIdRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload?;

    if !services
        .coordinator
        .return_asset(body.bike_id, principal.username())
    {
        return Err(ApiError::bad_request(
            "Bike is not booked by you or does not exist.",
        ));
    }
    Ok(errors::json_ok(StatusCode::OK, "Bike returned successfully!"))
}

/// POST /api/remove-bike
///
/// Failure messages name the reason: not found, not owner, or currently rented.
pub async fn remove_bike(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    payload: Result<Json<dto::BikeIdRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload?;

    services
        .coordinator
        .remove_asset(body.bike_id, principal.username())
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    Ok(errors::json_ok(StatusCode::OK, "Bike removed successfully."))
}

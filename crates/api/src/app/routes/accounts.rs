use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use pedalshare_core::DomainError;

use crate::app::dto;
use crate::app::errors::{self, ApiError};
use crate::app::services::AppServices;

/// POST /api/login
///
/// Verifies credentials and mints a bearer token for the username.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::CredentialsRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload?;
    let (username, password) = body.into_parts();

    if !services.coordinator.login(&username, &password) {
        return Err(ApiError::Unauthorized(
            "Invalid username or password.".to_string(),
        ));
    }

    let token = services
        .tokens
        .issue(&username, Utc::now())
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::info!(username = %username, "login succeeded");

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "success": true,
            "message": "Login successful!",
            "token": token,
            "username": username,
        })),
    )
        .into_response())
}

/// POST /api/register
pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::CredentialsRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload?;
    let (username, password) = body.validate()?;

    if !services.coordinator.register(&username, &password) {
        return Err(DomainError::conflict("Username already exists.").into());
    }

    Ok(errors::json_ok(
        StatusCode::CREATED,
        "Registration successful! Please log in.",
    ))
}

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use thiserror::Error;

use pedalshare_auth::{JwtValidator, TokenError};

use crate::app::errors;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Why a request failed authentication. Always rendered as 401.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing authorization header")]
    MissingHeader,

    #[error("authorization header must use the Bearer scheme")]
    BadScheme,

    #[error("invalid or expired token")]
    InvalidToken(#[source] TokenError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::InvalidToken(cause) => {
                tracing::debug!(error = %cause, "token validation failed");
            }
            other => tracing::debug!(error = %other, "request not authenticated"),
        }
        errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", self.to_string())
    }
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let token = extract_bearer(req.headers())?;

    let claims = state
        .jwt
        .validate(token, Utc::now())
        .map_err(AuthError::InvalidToken)?;

    req.extensions_mut().insert(PrincipalContext::new(claims.sub));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?;

    let header = header.to_str().map_err(|_| AuthError::BadScheme)?;

    let header = header.strip_prefix("Bearer ").ok_or(AuthError::BadScheme)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(AuthError::BadScheme);
    }

    Ok(token)
}

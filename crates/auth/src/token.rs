//! Signed access tokens (HS256 JWT).
//!
//! `jsonwebtoken` verifies the signature; the time window is checked by
//! [`validate_claims`] so expiry behaves identically in tests and in production.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use pedalshare_core::Username;

use crate::claims::{JwtClaims, TokenValidationError, validate_claims};

/// Default lifetime of an issued token, in minutes.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token could not be signed: {0}")]
    Encode(String),

    #[error("token is malformed or its signature is invalid")]
    InvalidSignature,

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Mints tokens for an authenticated subject.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, subject: &Username, now: DateTime<Utc>) -> Result<String, TokenError>;
}

/// Verifies a token and extracts its claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError>;
}

/// Symmetric HS256 token service.
#[derive(Clone)]
pub struct Hs256Jwt {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl core::fmt::Debug for Hs256Jwt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256Jwt").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl Hs256Jwt {
    pub fn new(secret: &[u8]) -> Self {
        Self::with_ttl(secret, Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES))
    }

    pub fn with_ttl(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        // Our claims carry RFC 3339 timestamps instead of numeric `exp`.
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation
    }
}

impl TokenIssuer for Hs256Jwt {
    fn issue(&self, subject: &Username, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = JwtClaims {
            sub: subject.clone(),
            issued_at: now,
            expires_at: now + self.ttl,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }
}

impl JwtValidator for Hs256Jwt {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &Self::validation())
            .map_err(|e| {
                tracing::debug!(error = %e, "token rejected");
                TokenError::InvalidSignature
            })?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

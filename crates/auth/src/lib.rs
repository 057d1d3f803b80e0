//! `pedalshare-auth`: credentials and signed access tokens.
//!
//! Decoupled from HTTP: the API layer extracts bearer tokens and asks a
//! [`JwtValidator`] for the subject; login asks the [`IdentityStore`].

pub mod claims;
pub mod identity;
pub mod token;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use identity::{IdentityStore, SEED_USERS};
pub use token::{DEFAULT_TOKEN_TTL_MINUTES, Hs256Jwt, JwtValidator, TokenError, TokenIssuer};

//! `pedalshare-core`: shared domain building blocks.
//!
//! Identifiers and the domain error type used by every other crate. No IO,
//! no locking, no serialization formats beyond serde derives.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{AssetId, Username};

//! Inventory of rentable bikes.
//!
//! The entity model ([`Asset`], [`ReservationRecord`]) and the thread-safe
//! [`InventoryStore`] that owns them. Booking, returning, listing and removal
//! are atomic state transitions; negative outcomes are return values, not
//! errors.

pub mod asset;
pub mod seed;
pub mod store;

pub use asset::{Asset, AssetSpec, ReservationRecord};
pub use seed::{SEED_OWNER, default_fleet};
pub use store::{FIRST_ASSET_ID, InventoryStore, RemoveError};

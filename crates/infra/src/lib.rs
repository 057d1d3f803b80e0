//! Infrastructure layer: configuration, serialization and use-case wiring.

pub mod codec;
pub mod config;
pub mod coordinator;

pub use codec::{Codec, CodecError, JsonCodec};
pub use config::{AppConfig, ConfigError};
pub use coordinator::{RentalCoordinator, SnapshotHub, SnapshotPayload};

//! Serialization collaborator used for broadcast payloads.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("serialize failed: {0}")]
    Serialize(String),

    #[error("deserialize failed: {0}")]
    Deserialize(String),
}

/// Turns values into wire text and back.
pub trait Codec: Send + Sync {
    fn serialize<T: Serialize>(&self, value: &T) -> Result<String, CodecError>;

    fn deserialize<T: DeserializeOwned>(&self, text: &str) -> Result<T, CodecError>;
}

/// JSON via `serde_json`.
#[derive(Debug, Default, Copy, Clone)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn serialize<T: Serialize>(&self, value: &T) -> Result<String, CodecError> {
        serde_json::to_string(value).map_err(|e| CodecError::Serialize(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, text: &str) -> Result<T, CodecError> {
        serde_json::from_str(text).map_err(|e| CodecError::Deserialize(e.to_string()))
    }
}

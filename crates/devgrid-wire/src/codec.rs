//! Serialization boundary.
//!
//! The envelope factory does not care how message bodies become bytes, only
//! that the codec is deterministic and lossless for round-trips. The seam is
//! a trait so tests and alternative deployments can substitute their own.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Serializes typed message bodies to opaque byte payloads and back.
pub trait Codec {
    /// Serialize a message body. Must be deterministic for identical input.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>>;

    /// Deserialize a message body previously produced by [`Codec::encode`].
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;
}

/// Compact binary codec backed by bincode.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl Codec for BincodeCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        Ok(bincode::serialize(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        Ok(bincode::deserialize(bytes)?)
    }
}

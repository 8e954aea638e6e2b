//! Error types for the wire layer.

use thiserror::Error;

/// Result type for wire operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building envelopes or classifying devices.
#[derive(Debug, Error)]
pub enum Error {
    /// A raw connection-state token that maps to no known status or type.
    ///
    /// There is no safe default for an unknown token, so classification
    /// fails loudly instead of coercing.
    #[error("Unknown connection state: {0}")]
    UnknownConnectionState(String),

    /// The codec rejected a message body.
    #[error("Serialization failed: {0}")]
    Codec(#[from] bincode::Error),

    /// A wire tag that maps to no known message kind.
    #[error("Unknown wire tag: {0}")]
    UnknownWireTag(u32),

    /// Other error.
    #[error("Other: {0}")]
    Other(#[from] anyhow::Error),
}

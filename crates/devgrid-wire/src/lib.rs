//! Wire contract for the DevGrid device pool.
//!
//! Worker processes publish commands to devices over a shared bus; devices
//! decide whether a broadcast applies to them by matching the command's
//! requirements against their advertised capabilities. This crate defines
//! the two halves of that routing contract:
//!
//! - **Envelope factory**: one constructor per message kind, all funneled
//!   through a single framing choke point so every envelope carries a stable
//!   wire tag plus a codec-serialized payload.
//! - **Requirement matcher**: evaluates a device's capability set against an
//!   ordered, ANDed requirement list with semver-range, glob, and exact
//!   comparison semantics.
//!
//! Everything here is synchronous and pure; transport delivery, device
//! lifecycle, and discovery live elsewhere.
//!
//! ## Example
//!
//! ```rust
//! use devgrid_wire::{matches_requirements, CapabilitySet, EnvelopeFactory, Requirement};
//!
//! fn main() -> devgrid_wire::Result<()> {
//!     let factory = EnvelopeFactory::new();
//!     let channel = factory.make_private_channel();
//!
//!     let requirements = vec![
//!         Requirement::exact("os", "android"),
//!         Requirement::glob("abi", "arm64-*"),
//!     ];
//!
//!     let mut capabilities = CapabilitySet::new();
//!     capabilities.insert("os".to_string(), "android".to_string());
//!     capabilities.insert("abi".to_string(), "arm64-v8a".to_string());
//!     assert!(matches_requirements(&capabilities, &requirements));
//!
//!     let frame = factory.make_group_message(channel, 30_000, requirements)?;
//!     assert!(!frame.is_empty());
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod envelope;
pub mod error;
pub mod matcher;
pub mod message;
pub mod status;

pub use codec::{BincodeCodec, Codec};
pub use envelope::{
    ChannelIdSource, Envelope, EnvelopeFactory, RandomChannelIds, GLOBAL_CHANNEL,
};
pub use error::{Error, Result};
pub use matcher::matches_requirements;
pub use message::{
    CapabilitySet, DeviceDataMessage, DeviceDoneMessage, DeviceFailMessage, DeviceIdentity,
    DeviceIdentityMessage, DevicePokeMessage, DevicePropertiesMessage, DeviceProperty,
    DeviceStatusMessage, GroupMessage, JoinGroupMessage, LeaveGroupMessage, MessageKind,
    ProbeMessage, Requirement, RequirementType, ShellCommandMessage,
};
pub use status::{DeviceStatus, DeviceType};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

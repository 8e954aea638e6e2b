//! Wire message taxonomy and typed message bodies.
//!
//! `MessageKind` is the closed vocabulary every process on the bus agrees on.
//! The discriminants are the wire tags; changing one is a breaking protocol
//! change, so they are written out explicitly and never reordered.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::status::DeviceStatus;

/// A device's advertised features, capability name to string value.
///
/// A `BTreeMap` so that iteration (and therefore any wire flattening derived
/// from it) is deterministic.
pub type CapabilitySet = BTreeMap<String, String>;

/// Semantic type of an envelope. Receivers dispatch on this tag without
/// inspecting the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum MessageKind {
    /// Heartbeat/liveness probe.
    Probe = 1,

    /// Broadcast invitation to join a channel, gated by requirements.
    Group = 10,
    /// A device opts into a channel.
    JoinGroup = 11,
    /// A device opts out of a channel.
    LeaveGroup = 12,
    /// Wake/attention signal addressed to one device.
    DevicePoke = 13,

    /// Identity report from a device.
    DeviceIdentity = 20,
    /// Property report from a device.
    DeviceProperties = 21,
    /// Reachability report for a device.
    DeviceStatus = 22,

    /// Shell command addressed to a channel.
    ShellCommand = 30,
    /// Streamed output fragment from a running command.
    DeviceData = 31,
    /// Terminal success signal for a command.
    DeviceDone = 32,
    /// Terminal failure signal for a command.
    DeviceFail = 33,
}

impl MessageKind {
    /// The stable numeric tag written on the wire.
    pub fn wire_tag(&self) -> u32 {
        *self as u32
    }

    /// Look up the kind for a wire tag. Unknown tags are rejected, never
    /// defaulted.
    pub fn from_wire_tag(tag: u32) -> Result<Self> {
        match tag {
            1 => Ok(Self::Probe),
            10 => Ok(Self::Group),
            11 => Ok(Self::JoinGroup),
            12 => Ok(Self::LeaveGroup),
            13 => Ok(Self::DevicePoke),
            20 => Ok(Self::DeviceIdentity),
            21 => Ok(Self::DeviceProperties),
            22 => Ok(Self::DeviceStatus),
            30 => Ok(Self::ShellCommand),
            31 => Ok(Self::DeviceData),
            32 => Ok(Self::DeviceDone),
            33 => Ok(Self::DeviceFail),
            other => Err(Error::UnknownWireTag(other)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Probe => "probe",
            Self::Group => "group",
            Self::JoinGroup => "join_group",
            Self::LeaveGroup => "leave_group",
            Self::DevicePoke => "device_poke",
            Self::DeviceIdentity => "device_identity",
            Self::DeviceProperties => "device_properties",
            Self::DeviceStatus => "device_status",
            Self::ShellCommand => "shell_command",
            Self::DeviceData => "device_data",
            Self::DeviceDone => "device_done",
            Self::DeviceFail => "device_fail",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Comparison semantics of a [`Requirement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum RequirementType {
    /// Capability must satisfy a semantic-version range.
    Semver = 1,
    /// Capability must match a shell-style glob pattern.
    Glob = 2,
    /// Capability must equal the value exactly.
    Exact = 3,
}

impl RequirementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Semver => "semver",
            Self::Glob => "glob",
            Self::Exact => "exact",
        }
    }
}

/// One matching criterion against a device's capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Capability name to look up.
    pub name: String,
    /// How to compare the capability value.
    pub kind: RequirementType,
    /// Expected value: a version range, a glob pattern, or a literal.
    pub value: String,
}

impl Requirement {
    pub fn new(
        name: impl Into<String>,
        kind: RequirementType,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            value: value.into(),
        }
    }

    pub fn semver(name: impl Into<String>, range: impl Into<String>) -> Self {
        Self::new(name, RequirementType::Semver, range)
    }

    pub fn glob(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(name, RequirementType::Glob, pattern)
    }

    pub fn exact(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, RequirementType::Exact, value)
    }
}

/// Identity fields a device reports once discovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub platform: String,
    pub manufacturer: String,
    pub model: String,
    pub version: String,
    pub abi: String,
    pub sdk: String,
}

/// One reported device property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProperty {
    pub name: String,
    pub value: String,
}

/// Broadcast invitation to join `channel`, delivered only to devices whose
/// capabilities satisfy `requirements`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMessage {
    pub channel: String,
    pub timeout_ms: u64,
    pub requirements: Vec<Requirement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinGroupMessage {
    pub serial: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveGroupMessage {
    pub serial: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicePokeMessage {
    pub serial: String,
    pub channel: String,
}

/// Identity report. The six identity fields are flattened positionally after
/// the serial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentityMessage {
    pub serial: String,
    pub platform: String,
    pub manufacturer: String,
    pub model: String,
    pub version: String,
    pub abi: String,
    pub sdk: String,
}

/// Property report. `properties` is an ordered sequence of (name, value)
/// pairs; the order is the wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicePropertiesMessage {
    pub serial: String,
    pub properties: Vec<DeviceProperty>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStatusMessage {
    pub serial: String,
    pub status: DeviceStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProbeMessage {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellCommandMessage {
    pub channel: String,
    pub command: String,
}

/// Streamed output fragment for a running command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDataMessage {
    pub serial: String,
    pub seq: u32,
    pub chunk: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDoneMessage {
    pub serial: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceFailMessage {
    pub serial: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_tags_round_trip() {
        let kinds = [
            MessageKind::Probe,
            MessageKind::Group,
            MessageKind::JoinGroup,
            MessageKind::LeaveGroup,
            MessageKind::DevicePoke,
            MessageKind::DeviceIdentity,
            MessageKind::DeviceProperties,
            MessageKind::DeviceStatus,
            MessageKind::ShellCommand,
            MessageKind::DeviceData,
            MessageKind::DeviceDone,
            MessageKind::DeviceFail,
        ];
        for kind in kinds {
            assert_eq!(MessageKind::from_wire_tag(kind.wire_tag()).unwrap(), kind);
        }
    }

    #[test]
    fn test_wire_tags_are_distinct() {
        let kinds = [
            MessageKind::Probe,
            MessageKind::Group,
            MessageKind::JoinGroup,
            MessageKind::LeaveGroup,
            MessageKind::DevicePoke,
            MessageKind::DeviceIdentity,
            MessageKind::DeviceProperties,
            MessageKind::DeviceStatus,
            MessageKind::ShellCommand,
            MessageKind::DeviceData,
            MessageKind::DeviceDone,
            MessageKind::DeviceFail,
        ];
        let mut tags: Vec<u32> = kinds.iter().map(|k| k.wire_tag()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), kinds.len());
    }

    #[test]
    fn test_unknown_wire_tag_rejected() {
        assert!(MessageKind::from_wire_tag(999).is_err());
    }

    #[test]
    fn test_requirement_helpers() {
        let req = Requirement::semver("sdk", ">=21.0.0");
        assert_eq!(req.name, "sdk");
        assert_eq!(req.kind, RequirementType::Semver);
        assert_eq!(req.value, ">=21.0.0");
    }
}

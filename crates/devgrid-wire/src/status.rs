//! Device reachability and kind classification.
//!
//! The device-state source reports raw connection-state tokens
//! (`device`, `emulator`, `unauthorized`, `offline`, `absent`). These map to
//! the closed enumerations the rest of the system dispatches on. An unknown
//! token is an integration error and is surfaced, never defaulted.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Classification of device reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceStatus {
    /// Device is connected and usable.
    Online,
    /// Device is connected but has not authorized this host.
    Unauthorized,
    /// Device is known but currently unreachable.
    Offline,
    /// Device has disappeared from the pool.
    Absent,
}

impl DeviceStatus {
    /// Classify a raw connection-state token. Both `device` and `emulator`
    /// classify as online.
    pub fn from_connection_state(raw: &str) -> Result<Self> {
        match raw {
            "device" | "emulator" => Ok(Self::Online),
            "unauthorized" => Ok(Self::Unauthorized),
            "offline" => Ok(Self::Offline),
            "absent" => Ok(Self::Absent),
            other => Err(Error::UnknownConnectionState(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Unauthorized => "unauthorized",
            Self::Offline => "offline",
            Self::Absent => "absent",
        }
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification of device kind, fixed once a device is discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    /// Real hardware.
    Physical,
    /// Emulated device.
    Virtual,
}

impl DeviceType {
    /// Classify a raw connection-state token.
    pub fn from_connection_state(raw: &str) -> Result<Self> {
        match raw {
            "device" => Ok(Self::Physical),
            "emulator" => Ok(Self::Virtual),
            other => Err(Error::UnknownConnectionState(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Virtual => "virtual",
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

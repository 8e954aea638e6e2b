//! Envelope framing and the per-kind message constructors.
//!
//! Every outbound message passes through [`EnvelopeFactory::envelope`], the
//! single choke point that frames a wire tag together with a serialized
//! payload. Message-specific shape lives in the individual constructors;
//! framing is centralized so it cannot drift between kinds.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::codec::{BincodeCodec, Codec};
use crate::error::Result;
use crate::message::{
    DeviceDataMessage, DeviceDoneMessage, DeviceFailMessage, DeviceIdentity,
    DeviceIdentityMessage, DevicePokeMessage, DevicePropertiesMessage, DeviceProperty,
    DeviceStatusMessage, GroupMessage, JoinGroupMessage, LeaveGroupMessage, MessageKind,
    ProbeMessage, Requirement, ShellCommandMessage,
};
use crate::status::DeviceStatus;

/// Well-known broadcast channel every device subscribes to.
pub const GLOBAL_CHANNEL: &str = "*ALL";

/// The unit placed on the transport: a wire tag plus the serialized payload.
///
/// Constructed once per send and never mutated afterwards; the fields are
/// private so no partial rewrite is possible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    tag: u32,
    payload: Vec<u8>,
}

impl Envelope {
    pub fn new(kind: MessageKind, payload: Vec<u8>) -> Self {
        Self {
            tag: kind.wire_tag(),
            payload,
        }
    }

    /// The message kind this envelope carries. Fails on a tag from a newer
    /// or foreign protocol revision.
    pub fn kind(&self) -> Result<MessageKind> {
        MessageKind::from_wire_tag(self.tag)
    }

    pub fn tag(&self) -> u32 {
        self.tag
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

/// Source of private channel identifiers.
///
/// Injected into the factory so tests can substitute a deterministic
/// sequence; must be safe for concurrent use.
pub trait ChannelIdSource: Send + Sync {
    /// Produce a fresh channel id. Ids are unguessable addressing tokens on
    /// a shared bus, so they must never repeat within the system's lifetime.
    fn next_channel_id(&self) -> String;
}

/// Default id source: 128 random bits from the OS entropy pool, base64.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomChannelIds;

impl ChannelIdSource for RandomChannelIds {
    fn next_channel_id(&self) -> String {
        let mut bytes = [0u8; 16];
        OsRng.fill_bytes(&mut bytes);
        BASE64.encode(bytes)
    }
}

/// Builds ready-to-transmit envelope buffers, one constructor per
/// [`MessageKind`].
///
/// Stateless apart from its collaborators; safe to share across threads.
pub struct EnvelopeFactory<C: Codec = BincodeCodec> {
    codec: C,
    channel_ids: Box<dyn ChannelIdSource>,
}

impl EnvelopeFactory<BincodeCodec> {
    pub fn new() -> Self {
        Self::with_codec(BincodeCodec)
    }
}

impl Default for EnvelopeFactory<BincodeCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Codec> EnvelopeFactory<C> {
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec,
            channel_ids: Box::new(RandomChannelIds),
        }
    }

    /// Replace the channel-id source, e.g. with a deterministic one in tests.
    pub fn with_channel_ids(mut self, channel_ids: Box<dyn ChannelIdSource>) -> Self {
        self.channel_ids = channel_ids;
        self
    }

    /// Generate a fresh private channel id.
    pub fn make_private_channel(&self) -> String {
        self.channel_ids.next_channel_id()
    }

    /// Frame a serialized payload with the wire tag for `kind`.
    ///
    /// Every constructor funnels through here, so framing is uniform across
    /// all message kinds.
    pub fn envelope(&self, kind: MessageKind, payload: Vec<u8>) -> Result<Vec<u8>> {
        trace!(kind = %kind, payload_len = payload.len(), "framing envelope");
        self.codec.encode(&Envelope::new(kind, payload))
    }

    pub fn make_group_message(
        &self,
        channel: impl Into<String>,
        timeout_ms: u64,
        requirements: Vec<Requirement>,
    ) -> Result<Vec<u8>> {
        let message = GroupMessage {
            channel: channel.into(),
            timeout_ms,
            requirements,
        };
        let payload = self.codec.encode(&message)?;
        self.envelope(MessageKind::Group, payload)
    }

    pub fn make_join_group_message(&self, serial: impl Into<String>) -> Result<Vec<u8>> {
        let message = JoinGroupMessage {
            serial: serial.into(),
        };
        let payload = self.codec.encode(&message)?;
        self.envelope(MessageKind::JoinGroup, payload)
    }

    pub fn make_leave_group_message(&self, serial: impl Into<String>) -> Result<Vec<u8>> {
        let message = LeaveGroupMessage {
            serial: serial.into(),
        };
        let payload = self.codec.encode(&message)?;
        self.envelope(MessageKind::LeaveGroup, payload)
    }

    pub fn make_device_poke_message(
        &self,
        serial: impl Into<String>,
        channel: impl Into<String>,
    ) -> Result<Vec<u8>> {
        let message = DevicePokeMessage {
            serial: serial.into(),
            channel: channel.into(),
        };
        let payload = self.codec.encode(&message)?;
        self.envelope(MessageKind::DevicePoke, payload)
    }

    pub fn make_device_identity_message(
        &self,
        serial: impl Into<String>,
        identity: &DeviceIdentity,
    ) -> Result<Vec<u8>> {
        let message = DeviceIdentityMessage {
            serial: serial.into(),
            platform: identity.platform.clone(),
            manufacturer: identity.manufacturer.clone(),
            model: identity.model.clone(),
            version: identity.version.clone(),
            abi: identity.abi.clone(),
            sdk: identity.sdk.clone(),
        };
        let payload = self.codec.encode(&message)?;
        self.envelope(MessageKind::DeviceIdentity, payload)
    }

    /// Properties flatten to an ordered (name, value) sequence; the map's
    /// sorted key order becomes the wire order, so identical maps always
    /// serialize to identical bytes.
    pub fn make_device_properties_message(
        &self,
        serial: impl Into<String>,
        properties: &BTreeMap<String, String>,
    ) -> Result<Vec<u8>> {
        let message = DevicePropertiesMessage {
            serial: serial.into(),
            properties: properties
                .iter()
                .map(|(name, value)| DeviceProperty {
                    name: name.clone(),
                    value: value.clone(),
                })
                .collect(),
        };
        let payload = self.codec.encode(&message)?;
        self.envelope(MessageKind::DeviceProperties, payload)
    }

    /// Classifies the raw connection-state token before building the
    /// message; an unknown token is surfaced as an error.
    pub fn make_device_status_message(
        &self,
        serial: impl Into<String>,
        connection_state: &str,
    ) -> Result<Vec<u8>> {
        let message = DeviceStatusMessage {
            serial: serial.into(),
            status: DeviceStatus::from_connection_state(connection_state)?,
        };
        let payload = self.codec.encode(&message)?;
        self.envelope(MessageKind::DeviceStatus, payload)
    }

    pub fn make_probe_message(&self) -> Result<Vec<u8>> {
        let payload = self.codec.encode(&ProbeMessage {})?;
        self.envelope(MessageKind::Probe, payload)
    }

    pub fn make_shell_command_message(
        &self,
        channel: impl Into<String>,
        command: impl Into<String>,
    ) -> Result<Vec<u8>> {
        let message = ShellCommandMessage {
            channel: channel.into(),
            command: command.into(),
        };
        let payload = self.codec.encode(&message)?;
        self.envelope(MessageKind::ShellCommand, payload)
    }

    pub fn make_device_data_message(
        &self,
        serial: impl Into<String>,
        seq: u32,
        chunk: Vec<u8>,
    ) -> Result<Vec<u8>> {
        let message = DeviceDataMessage {
            serial: serial.into(),
            seq,
            chunk,
        };
        let payload = self.codec.encode(&message)?;
        self.envelope(MessageKind::DeviceData, payload)
    }

    pub fn make_device_done_message(&self, serial: impl Into<String>) -> Result<Vec<u8>> {
        let message = DeviceDoneMessage {
            serial: serial.into(),
        };
        let payload = self.codec.encode(&message)?;
        self.envelope(MessageKind::DeviceDone, payload)
    }

    pub fn make_device_fail_message(
        &self,
        serial: impl Into<String>,
        reason: impl Into<String>,
    ) -> Result<Vec<u8>> {
        let message = DeviceFailMessage {
            serial: serial.into(),
            reason: reason.into(),
        };
        let payload = self.codec.encode(&message)?;
        self.envelope(MessageKind::DeviceFail, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_channel_shape() {
        let channel = RandomChannelIds.next_channel_id();
        // 16 bytes of entropy encode to 24 base64 characters.
        assert_eq!(channel.len(), 24);
        assert!(BASE64.decode(&channel).is_ok());
    }

    #[test]
    fn test_private_channels_differ() {
        let factory = EnvelopeFactory::new();
        assert_ne!(factory.make_private_channel(), factory.make_private_channel());
    }

    #[test]
    fn test_envelope_kind_round_trip() {
        let envelope = Envelope::new(MessageKind::Probe, vec![1, 2, 3]);
        assert_eq!(envelope.kind().unwrap(), MessageKind::Probe);
        assert_eq!(envelope.payload(), &[1, 2, 3]);
    }

    #[test]
    fn test_status_message_rejects_unknown_token() {
        let factory = EnvelopeFactory::new();
        assert!(factory.make_device_status_message("SERIAL1", "recovery").is_err());
    }

    #[test]
    fn test_properties_wire_order_is_sorted() {
        let factory = EnvelopeFactory::new();
        let mut a = BTreeMap::new();
        a.insert("ro.product.model".to_string(), "Pixel 7".to_string());
        a.insert("ro.build.version.sdk".to_string(), "33".to_string());

        let mut b = BTreeMap::new();
        b.insert("ro.build.version.sdk".to_string(), "33".to_string());
        b.insert("ro.product.model".to_string(), "Pixel 7".to_string());

        assert_eq!(
            factory.make_device_properties_message("SERIAL1", &a).unwrap(),
            factory.make_device_properties_message("SERIAL1", &b).unwrap()
        );
    }
}

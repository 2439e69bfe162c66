//! Error taxonomy (§7) and the MQTT 5 reason-code space.

use core::fmt;

/// Every way a decode or encode can fail.
///
/// `Truncated` is not really an error — it is the assembler's "come back
/// with more bytes" signal — but it rides the same `Result` so primitive
/// reads can use `?` uniformly. [`crate::mqtt::decoder::MessageAssembler`]
/// intercepts it before it ever reaches a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Not enough bytes were available to complete the current read.
    Truncated,
    /// A variable byte integer carried a continuation bit on its 4th byte.
    MalformedVarInt,
    /// The fixed header's upper nibble was 0 or greater than 15.
    UnknownMessageType(u8),
    /// A flags nibble that the spec fixes for this message type was wrong.
    ReservedFlagsViolation,
    /// The wire QoS value was 3.
    InvalidQos,
    /// A packet identifier was 0, or a property/field disagreed about its range.
    InvalidPacketId,
    /// A PUBLISH topic was empty or contained a wildcard character.
    InvalidTopic,
    /// A CONNECT payload client identifier violated the active version's rules.
    IdentifierRejected,
    /// `remainingLength` exceeded the configured `max_bytes_in_message`.
    MessageTooLarge,
    /// Catch-all: leftover bytes after a phase, unknown property id, property
    /// block overrun, or a message type unsupported by the active dialect.
    ProtocolViolation(&'static str),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Truncated => write!(f, "truncated: need more bytes"),
            DecodeError::MalformedVarInt => write!(f, "malformed variable byte integer"),
            DecodeError::UnknownMessageType(t) => write!(f, "unknown message type {t}"),
            DecodeError::ReservedFlagsViolation => write!(f, "reserved flags violation"),
            DecodeError::InvalidQos => write!(f, "invalid qos (wire value 3)"),
            DecodeError::InvalidPacketId => write!(f, "invalid packet identifier"),
            DecodeError::InvalidTopic => write!(f, "invalid topic name"),
            DecodeError::IdentifierRejected => write!(f, "client identifier rejected"),
            DecodeError::MessageTooLarge => write!(f, "message exceeds max_bytes_in_message"),
            DecodeError::ProtocolViolation(why) => write!(f, "protocol violation: {why}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

impl DecodeError {
    /// `true` for the one variant that means "suspend, don't fail."
    pub fn is_truncated(&self) -> bool {
        matches!(self, DecodeError::Truncated)
    }
}

/// A named view over the raw `u8` reason/return code carried in v5 variable
/// headers. The codec always stores the raw byte (so unknown/reserved
/// values round-trip); this is a convenience lookup, not the wire type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReasonCode(pub u8);

impl ReasonCode {
    pub const SUCCESS: ReasonCode = ReasonCode(0x00);
    pub const NORMAL_DISCONNECTION: ReasonCode = ReasonCode(0x00);
    pub const GRANTED_QOS_0: ReasonCode = ReasonCode(0x00);
    pub const GRANTED_QOS_1: ReasonCode = ReasonCode(0x01);
    pub const GRANTED_QOS_2: ReasonCode = ReasonCode(0x02);
    pub const DISCONNECT_WITH_WILL_MESSAGE: ReasonCode = ReasonCode(0x04);
    pub const NO_MATCHING_SUBSCRIBERS: ReasonCode = ReasonCode(0x10);
    pub const NO_SUBSCRIPTION_EXISTED: ReasonCode = ReasonCode(0x11);
    pub const CONTINUE_AUTHENTICATION: ReasonCode = ReasonCode(0x18);
    pub const REAUTHENTICATE: ReasonCode = ReasonCode(0x19);
    pub const UNSPECIFIED_ERROR: ReasonCode = ReasonCode(0x80);
    pub const MALFORMED_PACKET: ReasonCode = ReasonCode(0x81);
    pub const PROTOCOL_ERROR: ReasonCode = ReasonCode(0x82);
    pub const IMPLEMENTATION_SPECIFIC_ERROR: ReasonCode = ReasonCode(0x83);
    pub const UNSUPPORTED_PROTOCOL_VERSION: ReasonCode = ReasonCode(0x84);
    pub const CLIENT_IDENTIFIER_NOT_VALID: ReasonCode = ReasonCode(0x85);
    pub const BAD_USER_NAME_OR_PASSWORD: ReasonCode = ReasonCode(0x86);
    pub const NOT_AUTHORIZED: ReasonCode = ReasonCode(0x87);
    pub const SERVER_UNAVAILABLE: ReasonCode = ReasonCode(0x88);
    pub const SERVER_BUSY: ReasonCode = ReasonCode(0x89);
    pub const BANNED: ReasonCode = ReasonCode(0x8A);
    pub const SERVER_SHUTTING_DOWN: ReasonCode = ReasonCode(0x8B);
    pub const BAD_AUTHENTICATION_METHOD: ReasonCode = ReasonCode(0x8C);
    pub const KEEP_ALIVE_TIMEOUT: ReasonCode = ReasonCode(0x8D);
    pub const SESSION_TAKEN_OVER: ReasonCode = ReasonCode(0x8E);
    pub const TOPIC_FILTER_INVALID: ReasonCode = ReasonCode(0x8F);
    pub const TOPIC_NAME_INVALID: ReasonCode = ReasonCode(0x90);
    pub const PACKET_IDENTIFIER_IN_USE: ReasonCode = ReasonCode(0x91);
    pub const PACKET_IDENTIFIER_NOT_FOUND: ReasonCode = ReasonCode(0x92);
    pub const RECEIVE_MAXIMUM_EXCEEDED: ReasonCode = ReasonCode(0x93);
    pub const TOPIC_ALIAS_INVALID: ReasonCode = ReasonCode(0x94);
    pub const PACKET_TOO_LARGE: ReasonCode = ReasonCode(0x95);
    pub const MESSAGE_RATE_TOO_HIGH: ReasonCode = ReasonCode(0x96);
    pub const QUOTA_EXCEEDED: ReasonCode = ReasonCode(0x97);
    pub const ADMINISTRATIVE_ACTION: ReasonCode = ReasonCode(0x98);
    pub const PAYLOAD_FORMAT_INVALID: ReasonCode = ReasonCode(0x99);
    pub const RETAIN_NOT_SUPPORTED: ReasonCode = ReasonCode(0x9A);
    pub const QOS_NOT_SUPPORTED: ReasonCode = ReasonCode(0x9B);
    pub const USE_ANOTHER_SERVER: ReasonCode = ReasonCode(0x9C);
    pub const SERVER_MOVED: ReasonCode = ReasonCode(0x9D);
    pub const SHARED_SUBSCRIPTIONS_NOT_SUPPORTED: ReasonCode = ReasonCode(0x9E);
    pub const CONNECTION_RATE_EXCEEDED: ReasonCode = ReasonCode(0x9F);
    pub const MAXIMUM_CONNECT_TIME: ReasonCode = ReasonCode(0xA0);
    pub const SUBSCRIPTION_IDENTIFIERS_NOT_SUPPORTED: ReasonCode = ReasonCode(0xA1);
    pub const WILDCARD_SUBSCRIPTIONS_NOT_SUPPORTED: ReasonCode = ReasonCode(0xA2);

    /// The well-known name for this code, if any; unknown/reserved bytes
    /// just render as their hex value.
    pub fn name(self) -> Option<&'static str> {
        Some(match self.0 {
            0x00 => "Success",
            0x01 => "GrantedQos1",
            0x02 => "GrantedQos2",
            0x04 => "DisconnectWithWillMessage",
            0x10 => "NoMatchingSubscribers",
            0x11 => "NoSubscriptionExisted",
            0x18 => "ContinueAuthentication",
            0x19 => "Reauthenticate",
            0x80 => "UnspecifiedError",
            0x81 => "MalformedPacket",
            0x82 => "ProtocolError",
            0x83 => "ImplementationSpecificError",
            0x84 => "UnsupportedProtocolVersion",
            0x85 => "ClientIdentifierNotValid",
            0x86 => "BadUserNameOrPassword",
            0x87 => "NotAuthorized",
            0x88 => "ServerUnavailable",
            0x89 => "ServerBusy",
            0x8A => "Banned",
            0x8B => "ServerShuttingDown",
            0x8C => "BadAuthenticationMethod",
            0x8D => "KeepAliveTimeout",
            0x8E => "SessionTakenOver",
            0x8F => "TopicFilterInvalid",
            0x90 => "TopicNameInvalid",
            0x91 => "PacketIdentifierInUse",
            0x92 => "PacketIdentifierNotFound",
            0x93 => "ReceiveMaximumExceeded",
            0x94 => "TopicAliasInvalid",
            0x95 => "PacketTooLarge",
            0x96 => "MessageRateTooHigh",
            0x97 => "QuotaExceeded",
            0x98 => "AdministrativeAction",
            0x99 => "PayloadFormatInvalid",
            0x9A => "RetainNotSupported",
            0x9B => "QosNotSupported",
            0x9C => "UseAnotherServer",
            0x9D => "ServerMoved",
            0x9E => "SharedSubscriptionsNotSupported",
            0x9F => "ConnectionRateExceeded",
            0xA0 => "MaximumConnectTime",
            0xA1 => "SubscriptionIdentifiersNotSupported",
            0xA2 => "WildcardSubscriptionsNotSupported",
            _ => return None,
        })
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}(0x{:02X})", self.0),
            None => write!(f, "0x{:02X}", self.0),
        }
    }
}

impl From<u8> for ReasonCode {
    fn from(v: u8) -> Self {
        ReasonCode(v)
    }
}

impl From<ReasonCode> for u8 {
    fn from(v: ReasonCode) -> Self {
        v.0
    }
}

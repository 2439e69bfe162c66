use core::fmt;
use num_enum::TryFromPrimitive;
use serde::Serialize;
use serde::ser::Serializer;

/// MQTT Control Packet types — bits 7-4 of the fixed header's first byte.
/// `Auth` (15) is v5-only; the v3 dialect rejects it.
#[derive(Debug, PartialEq, Eq, Copy, Clone, TryFromPrimitive)]
#[repr(u8)]
pub enum MessageType {
    Connect = 1,
    ConnAck = 2,
    Publish = 3,
    PubAck = 4,
    PubRec = 5,
    PubRel = 6,
    PubComp = 7,
    Subscribe = 8,
    SubAck = 9,
    Unsubscribe = 10,
    UnsubAck = 11,
    PingReq = 12,
    PingResp = 13,
    Disconnect = 14,
    Auth = 15,
}

impl MessageType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::Connect => "connect",
            MessageType::ConnAck => "connack",
            MessageType::Publish => "publish",
            MessageType::PubAck => "puback",
            MessageType::PubRec => "pubrec",
            MessageType::PubRel => "pubrel",
            MessageType::PubComp => "pubcomp",
            MessageType::Subscribe => "subscribe",
            MessageType::SubAck => "suback",
            MessageType::Unsubscribe => "unsubscribe",
            MessageType::UnsubAck => "unsuback",
            MessageType::PingReq => "pingreq",
            MessageType::PingResp => "pingresp",
            MessageType::Disconnect => "disconnect",
            MessageType::Auth => "auth",
        }
    }

    /// PUBREL, SUBSCRIBE and UNSUBSCRIBE fix the lower flags nibble to
    /// `0b0010`; every other type other than PUBLISH fixes it to zero.
    pub fn fixed_flags_nibble(self) -> Option<u8> {
        match self {
            MessageType::PubRel | MessageType::Subscribe | MessageType::Unsubscribe => Some(0b0010),
            MessageType::Publish => None,
            _ => Some(0b0000),
        }
    }
}

impl Serialize for MessageType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_code_zero_and_above_fifteen_are_unknown() {
        assert!(MessageType::try_from(0u8).is_err());
        assert!(MessageType::try_from(16u8).is_err());
    }

    #[test]
    fn reserved_flag_nibble_table() {
        assert_eq!(MessageType::PubRel.fixed_flags_nibble(), Some(0b0010));
        assert_eq!(MessageType::Subscribe.fixed_flags_nibble(), Some(0b0010));
        assert_eq!(MessageType::Unsubscribe.fixed_flags_nibble(), Some(0b0010));
        assert_eq!(MessageType::Publish.fixed_flags_nibble(), None);
        assert_eq!(MessageType::Connect.fixed_flags_nibble(), Some(0b0000));
    }
}

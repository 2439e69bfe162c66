//! SUBSCRIBE payload entries: a topic filter plus its subscription options
//! byte. v3.1.1 only defines the QoS bits; v5 adds No Local, Retain As
//! Published and Retain Handling (§4.5).

use crate::mqtt::packet::qos::Qos;
use crate::mqtt::packet::retain_handling::RetainHandling;
use crate::mqtt::result_code::DecodeError;
use serde::Serialize;

/// A single subscription request's options byte, fully decoded.
///
/// v3.1.1 payloads only ever set `qos`; the remaining fields stay at their
/// defaults and are never written to the wire by the v3 dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubscriptionOptions {
    pub qos: Qos,
    pub no_local: bool,
    pub retain_as_published: bool,
    pub retain_handling: RetainHandling,
}

impl SubscriptionOptions {
    pub fn new(qos: Qos) -> Self {
        SubscriptionOptions {
            qos,
            no_local: false,
            retain_as_published: false,
            retain_handling: RetainHandling::SendAtSubscribe,
        }
    }

    /// Bits 2-7 of the v3.1.1 options byte are reserved and must be zero.
    /// (§9 open question: the source masks QoS without checking them; this
    /// codec rejects any non-zero upper bit instead of silently masking.)
    pub fn from_v3_byte(byte: u8) -> Result<Self, DecodeError> {
        if byte & 0xFC != 0 {
            return Err(DecodeError::ProtocolViolation(
                "reserved bits of the v3 subscription options byte must be zero",
            ));
        }
        let qos = Qos::try_from(byte & 0x03).map_err(|_| DecodeError::InvalidQos)?;
        Ok(SubscriptionOptions::new(qos))
    }

    pub fn to_v3_byte(self) -> u8 {
        self.qos as u8
    }

    /// v5 validates every bit: reserved bits 6-7 must be zero and retain
    /// handling must be one of the three defined values.
    pub fn from_v5_byte(byte: u8) -> Result<Self, DecodeError> {
        if byte & 0xC0 != 0 {
            return Err(DecodeError::ProtocolViolation(
                "reserved bits of the subscription options byte must be zero",
            ));
        }
        let qos = Qos::try_from(byte & 0x03).map_err(|_| DecodeError::InvalidQos)?;
        let no_local = byte & 0x04 != 0;
        let retain_as_published = byte & 0x08 != 0;
        let retain_handling = RetainHandling::try_from((byte >> 4) & 0x03)
            .map_err(|_| DecodeError::ProtocolViolation("invalid retain handling value"))?;
        Ok(SubscriptionOptions {
            qos,
            no_local,
            retain_as_published,
            retain_handling,
        })
    }

    pub fn to_v5_byte(self) -> u8 {
        let mut b = self.qos as u8;
        if self.no_local {
            b |= 0x04;
        }
        if self.retain_as_published {
            b |= 0x08;
        }
        b |= (self.retain_handling as u8) << 4;
        b
    }
}

//! Per-packet-type payload parsing and encoding (§4.5). Dispatch is by
//! [`MessageType`] and driven by the bytes remaining in the variable part
//! after the variable header has been consumed — the caller hands us an
//! exactly-sized sub-slice so "leftover after the loop" always means a
//! protocol violation rather than spillover into the next packet.

use crate::mqtt::common::ByteReader;
use crate::mqtt::packet::dialect::Dialect;
use crate::mqtt::packet::packet_type::MessageType;
use crate::mqtt::packet::primitive::{
    read_byte_array, read_u8, read_utf8_string, validate_client_id_v3_1, write_byte_array, write_u8,
    write_utf8_string,
};
use crate::mqtt::packet::qos::Qos;
use crate::mqtt::packet::subscription::SubscriptionOptions;
use crate::mqtt::packet::variable_header::VariableHeader;
use crate::mqtt::result_code::DecodeError;
use alloc::vec::Vec;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectPayload<'a> {
    pub client_id: &'a str,
    pub will_topic: Option<&'a str>,
    pub will_message: Option<&'a [u8]>,
    pub user_name: Option<&'a str>,
    pub password: Option<&'a [u8]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscribePayload<'a> {
    pub filters: Vec<(&'a str, SubscriptionOptions)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubAckPayload {
    pub reason_codes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnsubscribePayload<'a> {
    pub filters: Vec<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnsubAckPayload {
    pub reason_codes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Payload<'a> {
    Connect(ConnectPayload<'a>),
    Subscribe(SubscribePayload<'a>),
    SubAck(SubAckPayload),
    Unsubscribe(UnsubscribePayload<'a>),
    UnsubAck(UnsubAckPayload),
    /// Borrowed verbatim from the decoder's input window — zero-copy per §4.5.
    Publish(&'a [u8]),
    None,
}

/// Reads exactly `len` bytes of payload for `message_type`, given the
/// already-decoded variable header (some payload shapes are conditioned on
/// variable-header flags, e.g. CONNECT's will/user/password flags).
pub fn read_payload<'a>(
    message_type: MessageType,
    dialect: Dialect,
    variable_header: &VariableHeader<'a>,
    reader: &mut ByteReader<'a>,
    len: usize,
) -> Result<Payload<'a>, DecodeError> {
    let end = reader.position() + len;
    let payload = match message_type {
        MessageType::Connect => {
            let VariableHeader::Connect(vh) = variable_header else {
                return Err(DecodeError::ProtocolViolation("connect payload without connect variable header"));
            };
            let client_id = read_utf8_string(reader, 0, u16::MAX)?
                .ok_or(DecodeError::IdentifierRejected)?;
            if vh.protocol_level == 3 {
                validate_client_id_v3_1(client_id)?;
            }
            let (will_topic, will_message) = if vh.will_flag {
                let topic = read_utf8_string(reader, 0, u16::MAX)?
                    .ok_or(DecodeError::ProtocolViolation("malformed will topic"))?;
                let message = read_byte_array(reader)?;
                (Some(topic), Some(message))
            } else {
                (None, None)
            };
            let user_name = if vh.has_user_name {
                Some(read_utf8_string(reader, 0, u16::MAX)?
                    .ok_or(DecodeError::ProtocolViolation("malformed user name"))?)
            } else {
                None
            };
            let password = if vh.has_password {
                Some(read_byte_array(reader)?)
            } else {
                None
            };
            Payload::Connect(ConnectPayload {
                client_id,
                will_topic,
                will_message,
                user_name,
                password,
            })
        }
        MessageType::Subscribe => {
            let mut filters = Vec::new();
            while reader.position() < end {
                let filter = read_utf8_string(reader, 0, u16::MAX)?
                    .ok_or(DecodeError::ProtocolViolation("malformed topic filter"))?;
                let byte = read_u8(reader)?;
                let options = match dialect {
                    Dialect::V3 => SubscriptionOptions::from_v3_byte(byte)?,
                    Dialect::V5 => SubscriptionOptions::from_v5_byte(byte)?,
                };
                filters.push((filter, options));
            }
            Payload::Subscribe(SubscribePayload { filters })
        }
        MessageType::SubAck => {
            let mut reason_codes = Vec::new();
            while reader.position() < end {
                reason_codes.push(read_u8(reader)?);
            }
            Payload::SubAck(SubAckPayload { reason_codes })
        }
        MessageType::Unsubscribe => {
            let mut filters = Vec::new();
            while reader.position() < end {
                let filter = read_utf8_string(reader, 0, u16::MAX)?
                    .ok_or(DecodeError::ProtocolViolation("malformed topic filter"))?;
                filters.push(filter);
            }
            Payload::Unsubscribe(UnsubscribePayload { filters })
        }
        MessageType::UnsubAck => {
            // v3.1.1 UNSUBACK carries no payload; v5 carries one reason code
            // per unsubscribed filter (§9: verified against the v5 spec,
            // unlike the source's v3-derived reader it does not skip these).
            let mut reason_codes = Vec::new();
            while reader.position() < end {
                reason_codes.push(read_u8(reader)?);
            }
            Payload::UnsubAck(UnsubAckPayload { reason_codes })
        }
        MessageType::Publish => {
            let bytes = reader.read_bytes(len).ok_or(DecodeError::Truncated)?;
            Payload::Publish(bytes)
        }
        _ => Payload::None,
    };
    if reader.position() != end {
        return Err(DecodeError::ProtocolViolation(
            "payload did not consume exactly the declared remaining length",
        ));
    }
    Ok(payload)
}

pub fn write_connect_payload(out: &mut Vec<u8>, payload: &ConnectPayload<'_>) {
    write_utf8_string(out, payload.client_id);
    if let Some(topic) = payload.will_topic {
        write_utf8_string(out, topic);
        write_byte_array(out, payload.will_message.unwrap_or(&[]));
    }
    if let Some(user_name) = payload.user_name {
        write_utf8_string(out, user_name);
    }
    if let Some(password) = payload.password {
        write_byte_array(out, password);
    }
}

pub fn write_subscribe_payload(out: &mut Vec<u8>, payload: &SubscribePayload<'_>, dialect: Dialect) {
    for (filter, options) in &payload.filters {
        write_utf8_string(out, filter);
        let byte = match dialect {
            Dialect::V3 => options.to_v3_byte(),
            Dialect::V5 => options.to_v5_byte(),
        };
        write_u8(out, byte);
    }
}

pub fn write_suback_payload(out: &mut Vec<u8>, payload: &SubAckPayload) {
    for code in &payload.reason_codes {
        write_u8(out, *code);
    }
}

pub fn write_unsubscribe_payload(out: &mut Vec<u8>, payload: &UnsubscribePayload<'_>) {
    for filter in &payload.filters {
        write_utf8_string(out, filter);
    }
}

pub fn write_unsuback_payload(out: &mut Vec<u8>, payload: &UnsubAckPayload) {
    for code in &payload.reason_codes {
        write_u8(out, *code);
    }
}

/// Whether a QoS level requires a packet identifier on PUBLISH.
pub fn qos_requires_packet_id(qos: Qos) -> bool {
    qos != Qos::AtMostOnce
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mqtt::packet::variable_header::ConnectVariableHeader;

    fn empty_connect_vh() -> VariableHeader<'static> {
        VariableHeader::Connect(ConnectVariableHeader {
            protocol_name: "MQTT",
            protocol_level: 4,
            has_user_name: false,
            has_password: false,
            will_retain: false,
            will_qos: Qos::AtMostOnce,
            will_flag: false,
            clean_session: true,
            keep_alive_secs: 60,
            properties: Vec::new(),
        })
    }

    #[test]
    fn connect_payload_round_trip_no_will_no_credentials() {
        let payload = ConnectPayload {
            client_id: "test",
            will_topic: None,
            will_message: None,
            user_name: None,
            password: None,
        };
        let mut out = Vec::new();
        write_connect_payload(&mut out, &payload);
        let vh = empty_connect_vh();
        let mut reader = ByteReader::new(&out);
        let decoded = read_payload(MessageType::Connect, Dialect::V3, &vh, &mut reader, out.len()).unwrap();
        assert_eq!(decoded, Payload::Connect(payload));
    }

    #[test]
    fn subscribe_payload_leftover_bytes_is_protocol_violation() {
        let mut out = Vec::new();
        write_utf8_string(&mut out, "x");
        write_u8(&mut out, 0x01);
        out.push(0xFF); // dangling byte, not a full entry
        let mut reader = ByteReader::new(&out);
        let vh = VariableHeader::MessageId(crate::mqtt::packet::variable_header::MessageIdVariableHeader {
            packet_id: 1,
        });
        let err = read_payload(MessageType::Subscribe, Dialect::V3, &vh, &mut reader, out.len());
        assert!(err.is_err());
    }

    #[test]
    fn publish_payload_is_zero_copy_slice() {
        let bytes = [0xAAu8, 0xBB, 0xCC];
        let mut reader = ByteReader::new(&bytes);
        let vh = VariableHeader::Empty;
        let decoded = read_payload(MessageType::Publish, Dialect::V3, &vh, &mut reader, 3).unwrap();
        assert_eq!(decoded, Payload::Publish(&bytes[..]));
    }
}

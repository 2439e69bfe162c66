//! The variable-header dialect layer (§4.3, §9). `Dialect` is a
//! fieldless enum with two variants selected once at assembler
//! construction, rather than the teacher's per-{version,type} struct
//! explosion or a base-decoder subclass — the re-architecture spec.md §9
//! calls for.

use crate::mqtt::common::ByteReader;
use crate::mqtt::packet::fixed_header::FixedHeader;
use crate::mqtt::packet::packet_type::MessageType;
use crate::mqtt::packet::primitive::{read_u16_be, read_u8, read_utf8_string, validate_topic_name};
use crate::mqtt::packet::property::{read_properties, Properties};
use crate::mqtt::packet::qos::Qos;
use crate::mqtt::packet::variable_header::{
    ConnAckVariableHeader, ConnectVariableHeader, MessageIdPlusPropertiesVariableHeader,
    MessageIdVariableHeader, PubReplyVariableHeader, PublishVariableHeader,
    ReasonCodePlusPropertiesVariableHeader, VariableHeader,
};
use crate::mqtt::result_code::DecodeError;
use crate::mqtt::version::ProtocolVersion;
use alloc::vec::Vec;

/// The protocol-version-dependent variant of the variable-header and
/// property encoding. v3.1 and v3.1.1 share one dialect: both lack a
/// properties block and differ only in CONNECT payload client-id rules,
/// which live in the payload codec rather than here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    V3,
    V5,
}

impl Dialect {
    pub fn from_version(version: ProtocolVersion) -> Self {
        match version {
            ProtocolVersion::V3_1 | ProtocolVersion::V3_1_1 => Dialect::V3,
            ProtocolVersion::V5 => Dialect::V5,
        }
    }

    pub fn has_properties(self) -> bool {
        matches!(self, Dialect::V5)
    }
}

fn read_packet_id(reader: &mut ByteReader<'_>) -> Result<u16, DecodeError> {
    let pid = read_u16_be(reader)?;
    if pid == 0 {
        return Err(DecodeError::InvalidPacketId);
    }
    Ok(pid)
}

fn maybe_properties<'a>(dialect: Dialect, reader: &mut ByteReader<'a>) -> Result<Properties<'a>, DecodeError> {
    if dialect.has_properties() {
        read_properties(reader)
    } else {
        Ok(Vec::new())
    }
}

fn decode_connect<'a>(dialect: Dialect, reader: &mut ByteReader<'a>) -> Result<VariableHeader<'a>, DecodeError> {
    let protocol_name = read_utf8_string(reader, 0, u16::MAX)?
        .ok_or(DecodeError::ProtocolViolation("malformed protocol name"))?;
    let protocol_level = read_u8(reader)?;
    let resolved = ProtocolVersion::from_name_and_level(protocol_name, protocol_level)
        .ok_or(DecodeError::ProtocolViolation("unrecognized protocol name/level pair"))?;
    if Dialect::from_version(resolved) != dialect {
        return Err(DecodeError::ProtocolViolation(
            "CONNECT protocol name/level does not match the configured dialect",
        ));
    }
    let flags = read_u8(reader)?;
    if dialect == Dialect::V3 && flags & 0x01 != 0 {
        return Err(DecodeError::ReservedFlagsViolation);
    }
    let has_user_name = flags & 0x80 != 0;
    let has_password = flags & 0x40 != 0;
    let will_retain = flags & 0x20 != 0;
    let will_qos = Qos::try_from((flags >> 3) & 0x03).map_err(|_| DecodeError::InvalidQos)?;
    let will_flag = flags & 0x04 != 0;
    let clean_session = flags & 0x02 != 0;
    let keep_alive_secs = read_u16_be(reader)?;
    let properties = maybe_properties(dialect, reader)?;
    Ok(VariableHeader::Connect(ConnectVariableHeader {
        protocol_name,
        protocol_level,
        has_user_name,
        has_password,
        will_retain,
        will_qos,
        will_flag,
        clean_session,
        keep_alive_secs,
        properties,
    }))
}

fn decode_connack<'a>(dialect: Dialect, reader: &mut ByteReader<'a>) -> Result<VariableHeader<'a>, DecodeError> {
    let ack_flags = read_u8(reader)?;
    let session_present = ack_flags & 0x01 != 0;
    let return_code = read_u8(reader)?;
    let properties = maybe_properties(dialect, reader)?;
    Ok(VariableHeader::ConnAck(ConnAckVariableHeader {
        return_code,
        session_present,
        properties,
    }))
}

fn decode_publish<'a>(
    dialect: Dialect,
    fixed_header: &FixedHeader,
    reader: &mut ByteReader<'a>,
) -> Result<VariableHeader<'a>, DecodeError> {
    let topic_name = read_utf8_string(reader, 0, u16::MAX)?
        .ok_or(DecodeError::ProtocolViolation("malformed topic name"))?;
    validate_topic_name(topic_name)?;
    let packet_id = if fixed_header.qos != Qos::AtMostOnce {
        Some(read_packet_id(reader)?)
    } else {
        None
    };
    let properties = maybe_properties(dialect, reader)?;
    Ok(VariableHeader::Publish(PublishVariableHeader {
        topic_name,
        packet_id,
        properties,
    }))
}

/// PUBACK/PUBREC/PUBREL/PUBCOMP. v5 allows the reason code and property
/// block to be omitted entirely when both are at their default (Success,
/// empty) — a shorthand real brokers rely on to keep acks at 2 bytes.
fn decode_pub_reply<'a>(dialect: Dialect, reader: &mut ByteReader<'a>, end: usize) -> Result<VariableHeader<'a>, DecodeError> {
    let packet_id = read_packet_id(reader)?;
    match dialect {
        Dialect::V3 => Ok(VariableHeader::MessageId(MessageIdVariableHeader { packet_id })),
        Dialect::V5 => {
            if reader.position() == end {
                return Ok(VariableHeader::PubReply(PubReplyVariableHeader {
                    packet_id,
                    reason_code: 0,
                    properties: Vec::new(),
                }));
            }
            let reason_code = read_u8(reader)?;
            let properties = if reader.position() == end {
                Vec::new()
            } else {
                read_properties(reader)?
            };
            Ok(VariableHeader::PubReply(PubReplyVariableHeader {
                packet_id,
                reason_code,
                properties,
            }))
        }
    }
}

fn decode_subscribe<'a>(dialect: Dialect, reader: &mut ByteReader<'a>) -> Result<VariableHeader<'a>, DecodeError> {
    let packet_id = read_packet_id(reader)?;
    match dialect {
        Dialect::V3 => Ok(VariableHeader::MessageId(MessageIdVariableHeader { packet_id })),
        Dialect::V5 => {
            let properties = read_properties(reader)?;
            Ok(VariableHeader::MessageIdPlusProperties(MessageIdPlusPropertiesVariableHeader {
                packet_id,
                properties,
            }))
        }
    }
}

fn decode_unsubscribe<'a>(reader: &mut ByteReader<'a>) -> Result<VariableHeader<'a>, DecodeError> {
    // Both dialects: pid only (§4.3 table — v5 UNSUBSCRIBE has no properties).
    let packet_id = read_packet_id(reader)?;
    Ok(VariableHeader::MessageId(MessageIdVariableHeader { packet_id }))
}

/// DISCONNECT/AUTH reason-code-plus-properties shape, with the same "omit
/// when default" shorthand as PUBACK et al.
fn decode_reason_code_plus_properties<'a>(
    reader: &mut ByteReader<'a>,
    end: usize,
) -> Result<VariableHeader<'a>, DecodeError> {
    if reader.position() == end {
        return Ok(VariableHeader::ReasonCodePlusProperties(ReasonCodePlusPropertiesVariableHeader {
            reason_code: 0,
            properties: Vec::new(),
        }));
    }
    let reason_code = read_u8(reader)?;
    let properties = if reader.position() == end {
        Vec::new()
    } else {
        read_properties(reader)?
    };
    Ok(VariableHeader::ReasonCodePlusProperties(ReasonCodePlusPropertiesVariableHeader {
        reason_code,
        properties,
    }))
}

/// Decodes the variable header for `fixed_header.message_type` out of
/// `reader`, which must be bounded to exactly the bytes the assembler
/// carved out for this packet's variable header + payload (`end` is that
/// boundary's position). Dispatch table is §4.3.
pub fn decode_variable_header<'a>(
    dialect: Dialect,
    fixed_header: &FixedHeader,
    reader: &mut ByteReader<'a>,
    end: usize,
) -> Result<VariableHeader<'a>, DecodeError> {
    use MessageType::*;
    match fixed_header.message_type {
        Connect => decode_connect(dialect, reader),
        ConnAck => decode_connack(dialect, reader),
        Publish => decode_publish(dialect, fixed_header, reader),
        PubAck | PubRec | PubRel | PubComp => decode_pub_reply(dialect, reader, end),
        Subscribe => decode_subscribe(dialect, reader),
        SubAck => {
            let packet_id = read_packet_id(reader)?;
            match dialect {
                Dialect::V3 => Ok(VariableHeader::MessageId(MessageIdVariableHeader { packet_id })),
                Dialect::V5 => {
                    let properties = read_properties(reader)?;
                    Ok(VariableHeader::MessageIdPlusProperties(MessageIdPlusPropertiesVariableHeader {
                        packet_id,
                        properties,
                    }))
                }
            }
        }
        Unsubscribe => decode_unsubscribe(reader),
        UnsubAck => {
            let packet_id = read_packet_id(reader)?;
            match dialect {
                Dialect::V3 => Ok(VariableHeader::MessageId(MessageIdVariableHeader { packet_id })),
                Dialect::V5 => {
                    let properties = read_properties(reader)?;
                    Ok(VariableHeader::MessageIdPlusProperties(MessageIdPlusPropertiesVariableHeader {
                        packet_id,
                        properties,
                    }))
                }
            }
        }
        Disconnect => match dialect {
            Dialect::V3 => Ok(VariableHeader::Empty),
            Dialect::V5 => decode_reason_code_plus_properties(reader, end),
        },
        Auth => match dialect {
            Dialect::V3 => Err(DecodeError::ProtocolViolation("AUTH is not defined in the v3 dialect")),
            Dialect::V5 => decode_reason_code_plus_properties(reader, end),
        },
        PingReq | PingResp => Ok(VariableHeader::Empty),
    }
}

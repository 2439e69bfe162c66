//! MQTT 5 properties (§4.4). Every property wire value reduces to one of
//! three shapes — an integer (byte, two-byte, four-byte or variable byte
//! integer), a UTF-8 string (or, for User Property, a string pair), or a
//! length-prefixed byte array — so `Property` carries exactly those three
//! shapes rather than one struct per identifier. Order is preserved since
//! User Property may repeat and repetition is meaningful.

use crate::mqtt::common::ByteReader;
use crate::mqtt::packet::primitive::{
    read_byte_array, read_u16_be, read_u32_be, read_u8, read_utf8_string, write_byte_array,
    write_u16_be, write_u32_be, write_u8, write_utf8_string,
};
use crate::mqtt::packet::variable_byte_integer::VariableByteInteger;
use crate::mqtt::result_code::DecodeError;
use alloc::vec::Vec;
use num_enum::TryFromPrimitive;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, Serialize)]
#[repr(u8)]
pub enum PropertyId {
    PayloadFormatIndicator = 0x01,
    MessageExpiryInterval = 0x02,
    ContentType = 0x03,
    ResponseTopic = 0x08,
    CorrelationData = 0x09,
    SubscriptionIdentifier = 0x0B,
    SessionExpiryInterval = 0x11,
    AssignedClientIdentifier = 0x12,
    ServerKeepAlive = 0x13,
    AuthenticationMethod = 0x15,
    AuthenticationData = 0x16,
    RequestProblemInformation = 0x17,
    WillDelayInterval = 0x18,
    RequestResponseInformation = 0x19,
    ResponseInformation = 0x1A,
    ServerReference = 0x1C,
    ReasonString = 0x1F,
    ReceiveMaximum = 0x21,
    TopicAliasMaximum = 0x22,
    TopicAlias = 0x23,
    MaximumQos = 0x24,
    RetainAvailable = 0x25,
    UserProperty = 0x26,
    MaximumPacketSize = 0x27,
    WildcardSubscriptionAvailable = 0x28,
    SubscriptionIdentifierAvailable = 0x29,
    SharedSubscriptionAvailable = 0x2A,
}

enum Shape {
    Byte,
    TwoByte,
    FourByte,
    VarInt,
    Utf8String,
    Utf8StringPair,
    BinaryData,
}

impl PropertyId {
    fn shape(self) -> Shape {
        use PropertyId::*;
        match self {
            PayloadFormatIndicator
            | RequestProblemInformation
            | RequestResponseInformation
            | MaximumQos
            | RetainAvailable
            | WildcardSubscriptionAvailable
            | SubscriptionIdentifierAvailable
            | SharedSubscriptionAvailable => Shape::Byte,

            ServerKeepAlive | ReceiveMaximum | TopicAliasMaximum | TopicAlias => Shape::TwoByte,

            MessageExpiryInterval | SessionExpiryInterval | WillDelayInterval
            | MaximumPacketSize => Shape::FourByte,

            SubscriptionIdentifier => Shape::VarInt,

            ContentType | ResponseTopic | AssignedClientIdentifier | AuthenticationMethod
            | ResponseInformation | ServerReference | ReasonString => Shape::Utf8String,

            UserProperty => Shape::Utf8StringPair,

            CorrelationData | AuthenticationData => Shape::BinaryData,
        }
    }
}

/// One decoded property. Borrows string and binary payloads from the input
/// buffer — the assembler's buffer must outlive the decoded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Property<'a> {
    Integer(PropertyId, u32),
    Str(PropertyId, &'a str),
    UserProperty(&'a str, &'a str),
    Binary(PropertyId, &'a [u8]),
}

impl<'a> Property<'a> {
    pub fn id(&self) -> PropertyId {
        match self {
            Property::Integer(id, _) => *id,
            Property::Str(id, _) => *id,
            Property::UserProperty(_, _) => PropertyId::UserProperty,
            Property::Binary(id, _) => *id,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Property::Integer(_, v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Property::Str(_, v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match self {
            Property::Binary(_, v) => Some(*v),
            _ => None,
        }
    }
}

/// An ordered collection of properties as they appeared on the wire. Plain
/// `Vec` rather than a map: User Property may repeat, and encode order must
/// be preserved byte-for-byte on round trip.
pub type Properties<'a> = Vec<Property<'a>>;

fn read_one<'a>(reader: &mut ByteReader<'a>) -> Result<Property<'a>, DecodeError> {
    let id_vbi = VariableByteInteger::read(reader)?;
    let id_raw = id_vbi.to_u32();
    let id_byte = u8::try_from(id_raw)
        .map_err(|_| DecodeError::ProtocolViolation("property identifier out of range"))?;
    let id = PropertyId::try_from(id_byte)
        .map_err(|_| DecodeError::ProtocolViolation("unknown property identifier"))?;

    Ok(match id.shape() {
        Shape::Byte => Property::Integer(id, u32::from(read_u8(reader)?)),
        Shape::TwoByte => Property::Integer(id, u32::from(read_u16_be(reader)?)),
        Shape::FourByte => Property::Integer(id, read_u32_be(reader)?),
        Shape::VarInt => Property::Integer(id, VariableByteInteger::read(reader)?.to_u32()),
        Shape::Utf8String => {
            let s = read_utf8_string(reader, 0, u16::MAX)?
                .ok_or(DecodeError::ProtocolViolation("property string decode failed"))?;
            Property::Str(id, s)
        }
        Shape::Utf8StringPair => {
            let key = read_utf8_string(reader, 0, u16::MAX)?
                .ok_or(DecodeError::ProtocolViolation("user property key decode failed"))?;
            let value = read_utf8_string(reader, 0, u16::MAX)?
                .ok_or(DecodeError::ProtocolViolation("user property value decode failed"))?;
            Property::UserProperty(key, value)
        }
        Shape::BinaryData => Property::Binary(id, read_byte_array(reader)?),
    })
}

/// Reads the property-block length prefix, then decodes properties until
/// that many bytes have been consumed.
pub fn read_properties<'a>(reader: &mut ByteReader<'a>) -> Result<Properties<'a>, DecodeError> {
    let block_len = VariableByteInteger::read(reader)?.to_u32() as usize;
    let block_end = reader
        .position()
        .checked_add(block_len)
        .ok_or(DecodeError::MalformedVarInt)?;

    let mut properties = Vec::new();
    while reader.position() < block_end {
        let before = reader.position();
        let property = read_one(reader)?;
        if reader.position() > block_end {
            return Err(DecodeError::ProtocolViolation(
                "property overran its declared block length",
            ));
        }
        debug_assert!(reader.position() > before);
        properties.push(property);
    }
    Ok(properties)
}

fn write_one(out: &mut Vec<u8>, property: &Property<'_>) -> Result<(), DecodeError> {
    write_u8(out, property.id() as u8);
    match property {
        Property::Integer(id, v) => match id.shape() {
            Shape::Byte => write_u8(out, *v as u8),
            Shape::TwoByte => write_u16_be(out, *v as u16),
            Shape::FourByte => write_u32_be(out, *v),
            Shape::VarInt => {
                let vbi = VariableByteInteger::from_u32(*v)
                    .ok_or(DecodeError::ProtocolViolation("property value exceeds variable byte integer range"))?;
                out.extend_from_slice(&vbi.to_bytes());
            }
            _ => unreachable!("integer property with non-integer shape"),
        },
        Property::Str(_, s) => write_utf8_string(out, s),
        Property::UserProperty(k, v) => {
            write_utf8_string(out, k);
            write_utf8_string(out, v);
        }
        Property::Binary(_, b) => write_byte_array(out, b),
    }
    Ok(())
}

/// Encodes the property-block length prefix followed by each property in
/// order.
pub fn write_properties(out: &mut Vec<u8>, properties: &[Property<'_>]) -> Result<(), DecodeError> {
    let mut body = Vec::new();
    for property in properties {
        write_one(&mut body, property)?;
    }
    let len = VariableByteInteger::from_u32(body.len() as u32)
        .expect("property block never approaches the VBI limit within one message");
    out.extend_from_slice(&len.to_bytes());
    out.extend_from_slice(&body);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_property_block_decodes_to_empty_vec() {
        let bytes = [0x00u8];
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(read_properties(&mut reader).unwrap(), Vec::new());
    }

    #[test]
    fn round_trips_mixed_shapes() {
        let props = vec![
            Property::Integer(PropertyId::SessionExpiryInterval, 30),
            Property::Str(PropertyId::ContentType, "text/plain"),
            Property::UserProperty("k", "v"),
            Property::Binary(PropertyId::CorrelationData, &[1, 2, 3]),
        ];
        let mut out = Vec::new();
        write_properties(&mut out, &props).unwrap();
        let mut reader = ByteReader::new(&out);
        let decoded = read_properties(&mut reader).unwrap();
        assert_eq!(decoded, props);
    }

    #[test]
    fn subscription_identifier_uses_variable_byte_integer() {
        let props = vec![Property::Integer(PropertyId::SubscriptionIdentifier, 200)];
        let mut out = Vec::new();
        write_properties(&mut out, &props).unwrap();
        // block-len byte, then id byte 0x0B, then a 2-byte VBI for 200.
        assert_eq!(out[0] as usize, out.len() - 1);
        assert_eq!(out[1], 0x0B);
        assert_eq!(out.len(), 1 + 1 + 2);
    }

    #[test]
    fn unknown_property_identifier_is_rejected() {
        let bytes = [0x02u8, 0x7F, 0x00];
        let mut reader = ByteReader::new(&bytes);
        assert!(matches!(
            read_properties(&mut reader),
            Err(DecodeError::ProtocolViolation(_))
        ));
    }

    #[test]
    fn truncated_property_block_is_truncated_error() {
        let bytes = [0x05u8, 0x11, 0x00, 0x00];
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(read_properties(&mut reader), Err(DecodeError::Truncated));
    }

    #[test]
    fn subscription_identifier_beyond_vbi_range_is_an_encode_error() {
        let props = vec![Property::Integer(PropertyId::SubscriptionIdentifier, 0x1000_0000)];
        let mut out = Vec::new();
        assert!(matches!(
            write_properties(&mut out, &props),
            Err(DecodeError::ProtocolViolation(_))
        ));
    }
}

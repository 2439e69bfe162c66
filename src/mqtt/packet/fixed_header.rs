//! The fixed header: one type+flags byte followed by a variable byte
//! integer `remaining_length` (§4.2).

use crate::mqtt::common::ByteReader;
use crate::mqtt::packet::packet_type::MessageType;
use crate::mqtt::packet::qos::Qos;
use crate::mqtt::packet::variable_byte_integer::VariableByteInteger;
use crate::mqtt::result_code::DecodeError;
use arrayvec::ArrayVec;
use serde::Serialize;

/// Decoded type+flags byte together with the body length that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FixedHeader {
    pub message_type: MessageType,
    pub dup: bool,
    pub qos: Qos,
    pub retain: bool,
    pub remaining_length: u32,
}

impl FixedHeader {
    pub fn new_publish(dup: bool, qos: Qos, retain: bool, remaining_length: u32) -> Self {
        FixedHeader {
            message_type: MessageType::Publish,
            dup,
            qos,
            retain,
            remaining_length,
        }
    }

    /// Build the fixed header for a type whose flags nibble is fixed by the
    /// protocol (everything but PUBLISH).
    pub fn new_fixed_flags(message_type: MessageType, remaining_length: u32) -> Self {
        debug_assert!(message_type.fixed_flags_nibble().is_some());
        FixedHeader {
            message_type,
            dup: false,
            qos: Qos::AtMostOnce,
            retain: false,
            remaining_length,
        }
    }

    /// Reads and validates the type+flags byte, then the `remaining_length`
    /// variable byte integer. Checkpoints the reader itself so a partial
    /// read leaves it untouched on `Truncated`.
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        reader.checkpoint();
        let first = match reader.read_u8() {
            Some(b) => b,
            None => return Err(DecodeError::Truncated),
        };
        let type_nibble = first >> 4;
        let flags = first & 0x0F;
        let message_type = MessageType::try_from(type_nibble)
            .map_err(|_| DecodeError::UnknownMessageType(type_nibble))?;

        let (dup, qos, retain) = if message_type == MessageType::Publish {
            let qos_bits = (flags >> 1) & 0x03;
            let qos = Qos::try_from(qos_bits).map_err(|_| DecodeError::InvalidQos)?;
            (flags & 0x08 != 0, qos, flags & 0x01 != 0)
        } else {
            let expected = message_type
                .fixed_flags_nibble()
                .expect("non-publish types always have a fixed flags nibble");
            if flags != expected {
                return Err(DecodeError::ReservedFlagsViolation);
            }
            (false, Qos::AtMostOnce, false)
        };

        let remaining_length = match VariableByteInteger::read(reader) {
            Ok(vbi) => vbi.to_u32(),
            Err(DecodeError::Truncated) => {
                reader.rewind();
                return Err(DecodeError::Truncated);
            }
            Err(e) => return Err(e),
        };

        Ok(FixedHeader {
            message_type,
            dup,
            qos,
            retain,
            remaining_length,
        })
    }

    fn flags_byte(&self) -> u8 {
        if self.message_type == MessageType::Publish {
            let mut b = (self.qos as u8) << 1;
            if self.dup {
                b |= 0x08;
            }
            if self.retain {
                b |= 0x01;
            }
            b
        } else {
            self.message_type
                .fixed_flags_nibble()
                .expect("non-publish types always have a fixed flags nibble")
        }
    }

    /// Size of the encoded type+flags byte plus the remaining-length VBI.
    pub fn header_size(&self) -> Option<usize> {
        VariableByteInteger::from_u32(self.remaining_length).map(|v| 1 + v.size())
    }

    pub fn write_to(&self, out: &mut arrayvec::ArrayVec<u8, 5>) -> Result<(), DecodeError> {
        let first = (self.message_type.as_u8() << 4) | self.flags_byte();
        out.push(first);
        let vbi = VariableByteInteger::from_u32(self.remaining_length)
            .ok_or(DecodeError::MessageTooLarge)?;
        let mut buf: ArrayVec<u8, 4> = ArrayVec::new();
        vbi.write_to(&mut buf);
        out.try_extend_from_slice(&buf).expect("fits in 5 bytes");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_flags_round_trip() {
        let header = FixedHeader::new_publish(true, Qos::ExactlyOnce, true, 10);
        let mut buf: ArrayVec<u8, 5> = ArrayVec::new();
        header.write_to(&mut buf).unwrap();
        let mut reader = ByteReader::new(&buf);
        let decoded = FixedHeader::read(&mut reader).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn publish_wire_qos_three_is_invalid() {
        let bytes = [0x36u8, 0x00];
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(FixedHeader::read(&mut reader), Err(DecodeError::InvalidQos));
    }

    #[test]
    fn subscribe_requires_reserved_nibble() {
        let bytes = [0x80u8, 0x00];
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(
            FixedHeader::read(&mut reader),
            Err(DecodeError::ReservedFlagsViolation)
        );
        let bytes_ok = [0x82u8, 0x00];
        let mut reader_ok = ByteReader::new(&bytes_ok);
        assert!(FixedHeader::read(&mut reader_ok).is_ok());
    }

    #[test]
    fn disconnect_requires_zero_nibble() {
        let bytes = [0xE1u8, 0x00];
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(
            FixedHeader::read(&mut reader),
            Err(DecodeError::ReservedFlagsViolation)
        );
    }

    #[test]
    fn truncated_remaining_length_rewinds_reader() {
        let bytes = [0x10u8, 0x80];
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(FixedHeader::read(&mut reader), Err(DecodeError::Truncated));
        assert_eq!(reader.position(), 0, "reader must rewind to the start of the fixed header");
    }

    #[test]
    fn unknown_type_nibble_is_rejected() {
        let bytes = [0x00u8, 0x00];
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(
            FixedHeader::read(&mut reader),
            Err(DecodeError::UnknownMessageType(0))
        );
    }
}

//! The resumable decoder state machine (§4.6, §5).
//!
//! [`MessageAssembler::poll`] is handed the *entire* accumulated input
//! window on every call. It never retains a borrow across calls: on
//! `Truncated` it consumes nothing and returns [`Decoded::NeedMoreData`], so
//! the caller simply appends more bytes and calls again — the next call
//! re-parses the fixed header, variable header, and payload from byte 0 of
//! whatever is buffered. This is the checkpoint/rewind contract of §5 taken
//! to its logical conclusion: because nothing is consumed until an entire
//! message is available, "rewind to the last checkpoint" and "start over at
//! byte 0" coincide, which is exactly what makes suspend/restart
//! deterministic regardless of where the input happened to be chopped
//! (§8 property 4).
//!
//! The only state that survives across calls is `discarding`: once a fatal
//! error is emitted, every subsequent call reports the buffered bytes as
//! consumed without attempting to parse them (§4.6 `Discard` state).

use crate::mqtt::common::tracing::{error, trace, warn};
use crate::mqtt::common::ByteReader;
use crate::mqtt::packet::dialect::Dialect;
use crate::mqtt::packet::fixed_header::FixedHeader;
use crate::mqtt::packet::message::Message;
use crate::mqtt::packet::payload::read_payload;
use crate::mqtt::result_code::DecodeError;
use crate::mqtt::version::ProtocolVersion;

/// Upper bound on `remainingLength`, and which dialect to decode with.
/// Immutable after construction (§5: "the `maxBytesInMessage` configuration
/// is immutable after construction").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    pub max_bytes_in_message: u32,
    pub dialect: Dialect,
}

impl DecoderConfig {
    pub const DEFAULT_MAX_BYTES_IN_MESSAGE: u32 = 8_092;

    pub fn new(dialect: Dialect) -> Self {
        DecoderConfig {
            max_bytes_in_message: Self::DEFAULT_MAX_BYTES_IN_MESSAGE,
            dialect,
        }
    }

    pub fn for_version(version: ProtocolVersion) -> Self {
        Self::new(Dialect::from_version(version))
    }

    pub fn with_max_bytes_in_message(mut self, max: u32) -> Self {
        self.max_bytes_in_message = max;
        self
    }
}

/// One call's worth of decoder output.
#[derive(Debug, PartialEq, Eq)]
pub enum Decoded<'a> {
    /// Not enough bytes buffered yet; nothing was consumed. Not an error —
    /// the §7 `Truncated` signal made visible at the assembler boundary.
    NeedMoreData,
    /// One fully assembled message; `consumed` bytes should be dropped from
    /// the front of the caller's buffer before the next `poll` call.
    Message { message: Message<'a>, consumed: usize },
    /// A fatal decode error. The assembler has entered `Discard` and will
    /// report every future call as `Discarding` regardless of content.
    Invalid { cause: DecodeError, consumed: usize },
    /// Framing was already lost by a prior `Invalid`; `consumed` bytes are
    /// drained unconditionally (§4.6 `Discard`: "drain all bytes that
    /// become available; never re-enter normal states").
    Discarding { consumed: usize },
}

/// Drives the fixed→variable→payload progression described in §4.6. One
/// instance is owned by one connection (§5): it is not internally
/// synchronized, and holds no shared mutable state with any other
/// assembler.
#[derive(Debug, Clone)]
pub struct MessageAssembler {
    config: DecoderConfig,
    discarding: bool,
}

impl MessageAssembler {
    pub fn new(config: DecoderConfig) -> Self {
        MessageAssembler {
            config,
            discarding: false,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.config.dialect
    }

    /// `true` once a fatal error has put the assembler in `Discard`. There
    /// is no way back out short of constructing a new assembler — per §4.6,
    /// "once framing is lost, recovery is impossible on a reliable ordered
    /// transport."
    pub fn is_discarding(&self) -> bool {
        self.discarding
    }

    /// Attempt to decode one message out of `buf`. Never blocks and never
    /// allocates beyond what a single message's properties/lists require.
    pub fn poll<'a>(&mut self, buf: &'a [u8]) -> Decoded<'a> {
        if self.discarding {
            return Decoded::Discarding { consumed: buf.len() };
        }

        let mut reader = ByteReader::new(buf);
        match self.try_decode_one(&mut reader) {
            Ok(Some(message)) => {
                trace!("assembled one {} message, {} bytes consumed", message.message_type(), reader.position());
                Decoded::Message {
                    message,
                    consumed: reader.position(),
                }
            }
            Ok(None) => {
                trace!("{} bytes buffered, not enough to complete a message yet", buf.len());
                Decoded::NeedMoreData
            }
            Err(cause) => {
                self.discarding = true;
                error!("fatal decode error, entering discard state: {}", cause);
                Decoded::Invalid {
                    cause,
                    consumed: buf.len(),
                }
            }
        }
    }

    fn try_decode_one<'a>(&self, reader: &mut ByteReader<'a>) -> Result<Option<Message<'a>>, DecodeError> {
        let fixed_header = match FixedHeader::read(reader) {
            Ok(fh) => fh,
            Err(DecodeError::Truncated) => return Ok(None),
            Err(e) => return Err(e),
        };

        if fixed_header.remaining_length > self.config.max_bytes_in_message {
            warn!(
                "remaining length {} exceeds max_bytes_in_message {}",
                fixed_header.remaining_length, self.config.max_bytes_in_message
            );
            return Err(DecodeError::MessageTooLarge);
        }

        let remaining_length = fixed_header.remaining_length as usize;
        if reader.remaining_len() < remaining_length {
            // Not enough bytes for the variable header + payload yet; the
            // fixed header itself will be re-parsed on the next call since
            // nothing here has been permanently consumed by the caller.
            return Ok(None);
        }

        let body = reader
            .read_bytes(remaining_length)
            .expect("just checked remaining_len() >= remaining_length");
        let mut body_reader = ByteReader::new(body);
        let end = body_reader.remaining_len();

        let variable_header = crate::mqtt::packet::dialect::decode_variable_header(
            self.config.dialect,
            &fixed_header,
            &mut body_reader,
            end,
        )
        .map_err(|e| match e {
            DecodeError::Truncated => {
                DecodeError::ProtocolViolation("remaining length too small for variable header")
            }
            other => other,
        })?;

        let payload_len = body_reader.remaining_len();
        let payload = read_payload(
            fixed_header.message_type,
            self.config.dialect,
            &variable_header,
            &mut body_reader,
            payload_len,
        )
        .map_err(|e| match e {
            DecodeError::Truncated => DecodeError::ProtocolViolation("remaining length too small for payload"),
            other => other,
        })?;

        debug_assert_eq!(body_reader.remaining_len(), 0, "payload codec enforces exact consumption");

        Ok(Some(Message {
            fixed_header,
            variable_header,
            payload,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mqtt::packet::payload::Payload;
    use crate::mqtt::packet::variable_header::VariableHeader;

    fn v3_connect_bytes() -> Vec<u8> {
        vec![
            0x10, 0x10, 0x00, 0x04, b'M', b'Q', b'T', b'T', 0x04, 0x02, 0x00, 0x3C, 0x00, 0x04, b't', b'e',
            b's', b't',
        ]
    }

    #[test]
    fn decodes_one_message_and_reports_bytes_consumed() {
        let bytes = v3_connect_bytes();
        let mut assembler = MessageAssembler::new(DecoderConfig::new(Dialect::V3));
        match assembler.poll(&bytes) {
            Decoded::Message { message, consumed } => {
                assert_eq!(consumed, bytes.len());
                assert_eq!(message.message_type(), crate::mqtt::packet::packet_type::MessageType::Connect);
            }
            other => panic!("expected Message, got {other:?}"),
        }
    }

    #[test]
    fn truncated_input_needs_more_data_without_consuming() {
        let bytes = v3_connect_bytes();
        let mut assembler = MessageAssembler::new(DecoderConfig::new(Dialect::V3));
        for cut in 1..bytes.len() {
            let mut a = assembler.clone();
            assert_eq!(a.poll(&bytes[..cut]), Decoded::NeedMoreData, "cut at {cut}");
        }
        assert!(matches!(assembler.poll(&bytes), Decoded::Message { .. }));
    }

    #[test]
    fn oversized_message_is_rejected_and_enters_discard() {
        let mut bytes = v3_connect_bytes();
        bytes[1] = 0x7F; // inflate the declared remaining length
        let mut assembler = MessageAssembler::new(DecoderConfig::new(Dialect::V3).with_max_bytes_in_message(4));
        match assembler.poll(&bytes) {
            Decoded::Invalid { cause, .. } => assert_eq!(cause, DecodeError::MessageTooLarge),
            other => panic!("expected Invalid, got {other:?}"),
        }
        assert!(assembler.is_discarding());
        assert!(matches!(assembler.poll(b"anything"), Decoded::Discarding { .. }));
    }

    #[test]
    fn wildcard_topic_is_rejected() {
        // PUBLISH qos0, topic "a/#"
        let bytes = [0x30u8, 0x05, 0x00, 0x03, b'a', b'/', b'#'];
        let mut assembler = MessageAssembler::new(DecoderConfig::new(Dialect::V3));
        match assembler.poll(&bytes) {
            Decoded::Invalid { cause, .. } => assert_eq!(cause, DecodeError::InvalidTopic),
            other => panic!("expected Invalid(InvalidTopic), got {other:?}"),
        }
    }

    #[test]
    fn suspend_restart_is_deterministic_across_split_points() {
        let bytes = v3_connect_bytes();
        for split in 0..=bytes.len() {
            let mut assembler = MessageAssembler::new(DecoderConfig::new(Dialect::V3));
            let mut buf: Vec<u8> = bytes[..split].to_vec();
            let first = assembler.poll(&buf);
            let message = match first {
                Decoded::Message { message, .. } => Some(message),
                Decoded::NeedMoreData => {
                    buf.extend_from_slice(&bytes[split..]);
                    match assembler.poll(&buf) {
                        Decoded::Message { message, .. } => Some(message),
                        other => panic!("split {split}: expected Message on resume, got {other:?}"),
                    }
                }
                other => panic!("split {split}: unexpected {other:?}"),
            };
            let message = message.unwrap();
            assert_eq!(message.message_type(), crate::mqtt::packet::packet_type::MessageType::Connect);
            match &message.payload {
                Payload::Connect(p) => assert_eq!(p.client_id, "test"),
                other => panic!("expected Connect payload, got {other:?}"),
            }
            match &message.variable_header {
                VariableHeader::Connect(vh) => assert!(vh.clean_session),
                other => panic!("expected Connect variable header, got {other:?}"),
            }
        }
    }
}

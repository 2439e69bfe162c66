//! Fluent constructors for outbound messages (§4.7). Each builder collects
//! configuration, validates it against the active protocol version on
//! `build()`, and encodes straight to wire bytes rather than to an
//! intermediate typed [`Message`](crate::mqtt::packet::Message) — decoding
//! borrows from the caller's buffer, encoding owns its data, and keeping the
//! two representations separate avoids a lifetime that means different
//! things on each side.

use crate::mqtt::packet::dialect::Dialect;
use crate::mqtt::packet::fixed_header::FixedHeader;
use crate::mqtt::packet::packet_type::MessageType;
use crate::mqtt::packet::primitive::{
    validate_client_id_v3_1, validate_topic_filter, validate_topic_name, write_byte_array, write_u16_be,
    write_u8, write_utf8_string,
};
use crate::mqtt::packet::property::{write_properties, Property, PropertyId};
use crate::mqtt::packet::qos::Qos;
use crate::mqtt::packet::subscription::SubscriptionOptions;
use crate::mqtt::result_code::DecodeError;
use crate::mqtt::version::ProtocolVersion;
use alloc::string::String;
use alloc::vec::Vec;
use arrayvec::ArrayVec;
use derive_builder::Builder;

/// An owned mirror of [`Property`], for builders that cannot borrow from an
/// input buffer because nothing has been received yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnedProperty {
    Integer(PropertyId, u32),
    Str(PropertyId, String),
    UserProperty(String, String),
    Binary(PropertyId, Vec<u8>),
}

impl OwnedProperty {
    fn as_borrowed(&self) -> Property<'_> {
        match self {
            OwnedProperty::Integer(id, v) => Property::Integer(*id, *v),
            OwnedProperty::Str(id, s) => Property::Str(*id, s.as_str()),
            OwnedProperty::UserProperty(k, v) => Property::UserProperty(k.as_str(), v.as_str()),
            OwnedProperty::Binary(id, b) => Property::Binary(*id, b.as_slice()),
        }
    }
}

pub type OwnedProperties = Vec<OwnedProperty>;

fn encode_properties(out: &mut Vec<u8>, properties: &[OwnedProperty]) -> Result<(), DecodeError> {
    let borrowed: Vec<Property<'_>> = properties.iter().map(OwnedProperty::as_borrowed).collect();
    write_properties(out, &borrowed)
}

/// The raw wire bytes a builder produced. Round-trippable through
/// [`crate::mqtt::decoder::MessageAssembler`] but otherwise opaque — sending
/// it is the caller's job, per the sans-I/O boundary (§1 Non-goals).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMessage(Vec<u8>);

impl EncodedMessage {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

fn encode(fixed_header: &FixedHeader, body: Vec<u8>) -> Result<EncodedMessage, DecodeError> {
    let mut header_bytes: ArrayVec<u8, 5> = ArrayVec::new();
    fixed_header.write_to(&mut header_bytes)?;
    let mut out = Vec::with_capacity(header_bytes.len() + body.len());
    out.extend_from_slice(&header_bytes);
    out.extend_from_slice(&body);
    Ok(EncodedMessage(out))
}

fn finish_fixed_flags(message_type: MessageType, body: Vec<u8>) -> Result<EncodedMessage, DecodeError> {
    let remaining_length = u32::try_from(body.len()).map_err(|_| DecodeError::MessageTooLarge)?;
    encode(&FixedHeader::new_fixed_flags(message_type, remaining_length), body)
}

fn finish_publish(dup: bool, qos: Qos, retain: bool, body: Vec<u8>) -> Result<EncodedMessage, DecodeError> {
    let remaining_length = u32::try_from(body.len()).map_err(|_| DecodeError::MessageTooLarge)?;
    encode(&FixedHeader::new_publish(dup, qos, retain, remaining_length), body)
}

/// CONNECT's flags byte: bit7 user name present, bit6 password present,
/// bit5 will retain, bits4-3 will QoS, bit2 will flag, bit1 clean session,
/// bit0 reserved (must stay zero, §4.3).
fn connect_flags_byte(
    has_user_name: bool,
    has_password: bool,
    will_retain: bool,
    will_qos: Qos,
    will_flag: bool,
    clean_session: bool,
) -> u8 {
    let mut b = 0u8;
    if has_user_name {
        b |= 0x80;
    }
    if has_password {
        b |= 0x40;
    }
    if will_retain {
        b |= 0x20;
    }
    b |= (will_qos as u8) << 3;
    if will_flag {
        b |= 0x04;
    }
    if clean_session {
        b |= 0x02;
    }
    b
}

#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(pattern = "owned", setter(into), build_fn(skip))]
pub struct Connect {
    protocol_version: ProtocolVersion,
    client_id: String,
    #[builder(setter(into, strip_option))]
    clean_session: Option<bool>,
    #[builder(setter(into, strip_option))]
    keep_alive_secs: Option<u16>,
    #[builder(setter(into, strip_option))]
    will_topic: Option<String>,
    #[builder(setter(into, strip_option))]
    will_message: Option<Vec<u8>>,
    #[builder(setter(into, strip_option))]
    will_qos: Option<Qos>,
    #[builder(setter(into, strip_option))]
    will_retain: Option<bool>,
    #[builder(setter(into, strip_option))]
    user_name: Option<String>,
    #[builder(setter(into, strip_option))]
    password: Option<Vec<u8>>,
    #[builder(setter(into, strip_option))]
    properties: Option<OwnedProperties>,
}

impl Connect {
    pub fn builder() -> ConnectBuilder {
        ConnectBuilder::default()
    }
}

impl ConnectBuilder {
    pub fn build(self) -> Result<EncodedMessage, DecodeError> {
        let protocol_version = self
            .protocol_version
            .ok_or(DecodeError::ProtocolViolation("protocol_version is required"))?;
        let client_id = self
            .client_id
            .ok_or(DecodeError::ProtocolViolation("client_id is required"))?;
        if protocol_version == ProtocolVersion::V3_1 {
            validate_client_id_v3_1(&client_id)?;
        }

        let will_topic = self.will_topic.flatten();
        let will_message = self.will_message.flatten();
        if will_topic.is_some() != will_message.is_some() {
            return Err(DecodeError::ProtocolViolation(
                "will_topic and will_message must be set together or not at all",
            ));
        }
        let user_name = self.user_name.flatten();
        let password = self.password.flatten();
        if password.is_some() && user_name.is_none() {
            return Err(DecodeError::ProtocolViolation(
                "password requires user_name to also be set",
            ));
        }

        let dialect = Dialect::from_version(protocol_version);
        let properties = self.properties.flatten().unwrap_or_default();
        if !properties.is_empty() && dialect != Dialect::V5 {
            return Err(DecodeError::ProtocolViolation(
                "properties are only valid on the v5 dialect",
            ));
        }

        let will_flag = will_topic.is_some();
        let will_qos = self.will_qos.flatten().unwrap_or(Qos::AtMostOnce);
        if !will_flag && will_qos != Qos::AtMostOnce {
            return Err(DecodeError::ProtocolViolation(
                "will_qos requires will_topic/will_message to be set",
            ));
        }
        let will_retain = self.will_retain.flatten().unwrap_or(false);
        let clean_session = self.clean_session.flatten().unwrap_or(true);
        let keep_alive_secs = self.keep_alive_secs.flatten().unwrap_or(0);

        let flags = connect_flags_byte(
            user_name.is_some(),
            password.is_some(),
            will_retain,
            will_qos,
            will_flag,
            clean_session,
        );

        let mut body = Vec::new();
        write_utf8_string(&mut body, protocol_version.protocol_name());
        write_u8(&mut body, protocol_version.level());
        write_u8(&mut body, flags);
        write_u16_be(&mut body, keep_alive_secs);
        if dialect == Dialect::V5 {
            encode_properties(&mut body, &properties)?;
        }
        write_utf8_string(&mut body, &client_id);
        if let (Some(topic), Some(message)) = (&will_topic, &will_message) {
            write_utf8_string(&mut body, topic);
            write_byte_array(&mut body, message);
        }
        if let Some(name) = &user_name {
            write_utf8_string(&mut body, name);
        }
        if let Some(pw) = &password {
            write_byte_array(&mut body, pw);
        }

        finish_fixed_flags(MessageType::Connect, body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(pattern = "owned", setter(into), build_fn(skip))]
pub struct ConnAck {
    protocol_version: ProtocolVersion,
    #[builder(setter(into, strip_option))]
    session_present: Option<bool>,
    #[builder(setter(into, strip_option))]
    reason_code: Option<u8>,
    #[builder(setter(into, strip_option))]
    properties: Option<OwnedProperties>,
}

impl ConnAck {
    pub fn builder() -> ConnAckBuilder {
        ConnAckBuilder::default()
    }
}

impl ConnAckBuilder {
    pub fn build(self) -> Result<EncodedMessage, DecodeError> {
        let protocol_version = self
            .protocol_version
            .ok_or(DecodeError::ProtocolViolation("protocol_version is required"))?;
        let dialect = Dialect::from_version(protocol_version);
        let session_present = self.session_present.flatten().unwrap_or(false);
        let reason_code = self.reason_code.flatten().unwrap_or(0);
        let properties = self.properties.flatten().unwrap_or_default();
        if !properties.is_empty() && dialect != Dialect::V5 {
            return Err(DecodeError::ProtocolViolation(
                "properties are only valid on the v5 dialect",
            ));
        }

        let mut body = Vec::new();
        write_u8(&mut body, if session_present { 0x01 } else { 0x00 });
        write_u8(&mut body, reason_code);
        if dialect == Dialect::V5 {
            encode_properties(&mut body, &properties)?;
        }
        finish_fixed_flags(MessageType::ConnAck, body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(pattern = "owned", setter(into), build_fn(skip))]
pub struct Publish {
    protocol_version: ProtocolVersion,
    topic_name: String,
    #[builder(setter(into, strip_option))]
    qos: Option<Qos>,
    #[builder(setter(into, strip_option))]
    retain: Option<bool>,
    #[builder(setter(into, strip_option))]
    dup: Option<bool>,
    #[builder(setter(into, strip_option))]
    packet_id: Option<u16>,
    #[builder(setter(into, strip_option))]
    properties: Option<OwnedProperties>,
    #[builder(setter(into, strip_option))]
    payload: Option<Vec<u8>>,
}

impl Publish {
    pub fn builder() -> PublishBuilder {
        PublishBuilder::default()
    }
}

impl PublishBuilder {
    pub fn build(self) -> Result<EncodedMessage, DecodeError> {
        let protocol_version = self
            .protocol_version
            .ok_or(DecodeError::ProtocolViolation("protocol_version is required"))?;
        let topic_name = self
            .topic_name
            .ok_or(DecodeError::ProtocolViolation("topic_name is required"))?;
        validate_topic_name(&topic_name)?;

        let dialect = Dialect::from_version(protocol_version);
        let qos = self.qos.flatten().unwrap_or(Qos::AtMostOnce);
        let retain = self.retain.flatten().unwrap_or(false);
        let dup = self.dup.flatten().unwrap_or(false);
        let packet_id = self.packet_id.flatten();
        let properties = self.properties.flatten().unwrap_or_default();
        let payload = self.payload.flatten().unwrap_or_default();

        if !properties.is_empty() && dialect != Dialect::V5 {
            return Err(DecodeError::ProtocolViolation(
                "properties are only valid on the v5 dialect",
            ));
        }
        let packet_id = if qos == Qos::AtMostOnce {
            if packet_id.is_some() {
                return Err(DecodeError::ProtocolViolation("QoS 0 PUBLISH must not carry a packet id"));
            }
            None
        } else {
            let pid = packet_id.ok_or(DecodeError::ProtocolViolation(
                "QoS 1/2 PUBLISH requires a packet id",
            ))?;
            if pid == 0 {
                return Err(DecodeError::InvalidPacketId);
            }
            Some(pid)
        };

        let mut body = Vec::new();
        write_utf8_string(&mut body, &topic_name);
        if let Some(pid) = packet_id {
            write_u16_be(&mut body, pid);
        }
        if dialect == Dialect::V5 {
            encode_properties(&mut body, &properties)?;
        }
        body.extend_from_slice(&payload);

        finish_publish(dup, qos, retain, body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(pattern = "owned", setter(into), build_fn(skip))]
pub struct Subscribe {
    protocol_version: ProtocolVersion,
    packet_id: u16,
    filters: Vec<(String, SubscriptionOptions)>,
    #[builder(setter(into, strip_option))]
    properties: Option<OwnedProperties>,
}

impl Subscribe {
    pub fn builder() -> SubscribeBuilder {
        SubscribeBuilder::default()
    }
}

impl SubscribeBuilder {
    pub fn build(self) -> Result<EncodedMessage, DecodeError> {
        let protocol_version = self
            .protocol_version
            .ok_or(DecodeError::ProtocolViolation("protocol_version is required"))?;
        let packet_id = self
            .packet_id
            .ok_or(DecodeError::ProtocolViolation("packet_id is required"))?;
        if packet_id == 0 {
            return Err(DecodeError::InvalidPacketId);
        }
        let filters = self
            .filters
            .ok_or(DecodeError::ProtocolViolation("at least one filter is required"))?;
        if filters.is_empty() {
            return Err(DecodeError::ProtocolViolation("at least one filter is required"));
        }
        for (filter, _) in &filters {
            validate_topic_filter(filter)?;
        }

        let dialect = Dialect::from_version(protocol_version);
        let properties = self.properties.flatten().unwrap_or_default();
        if !properties.is_empty() && dialect != Dialect::V5 {
            return Err(DecodeError::ProtocolViolation(
                "properties are only valid on the v5 dialect",
            ));
        }

        let mut body = Vec::new();
        write_u16_be(&mut body, packet_id);
        if dialect == Dialect::V5 {
            encode_properties(&mut body, &properties)?;
        }
        for (filter, options) in &filters {
            write_utf8_string(&mut body, filter);
            let byte = match dialect {
                Dialect::V3 => options.to_v3_byte(),
                Dialect::V5 => options.to_v5_byte(),
            };
            write_u8(&mut body, byte);
        }

        finish_fixed_flags(MessageType::Subscribe, body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(pattern = "owned", setter(into), build_fn(skip))]
pub struct Unsubscribe {
    protocol_version: ProtocolVersion,
    packet_id: u16,
    filters: Vec<String>,
}

impl Unsubscribe {
    pub fn builder() -> UnsubscribeBuilder {
        UnsubscribeBuilder::default()
    }
}

impl UnsubscribeBuilder {
    pub fn build(self) -> Result<EncodedMessage, DecodeError> {
        let _protocol_version = self
            .protocol_version
            .ok_or(DecodeError::ProtocolViolation("protocol_version is required"))?;
        let packet_id = self
            .packet_id
            .ok_or(DecodeError::ProtocolViolation("packet_id is required"))?;
        if packet_id == 0 {
            return Err(DecodeError::InvalidPacketId);
        }
        let filters = self
            .filters
            .ok_or(DecodeError::ProtocolViolation("at least one filter is required"))?;
        if filters.is_empty() {
            return Err(DecodeError::ProtocolViolation("at least one filter is required"));
        }

        let mut body = Vec::new();
        write_u16_be(&mut body, packet_id);
        for filter in &filters {
            write_utf8_string(&mut body, filter);
        }

        finish_fixed_flags(MessageType::Unsubscribe, body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(pattern = "owned", setter(into), build_fn(skip))]
pub struct SubAck {
    protocol_version: ProtocolVersion,
    packet_id: u16,
    reason_codes: Vec<u8>,
    #[builder(setter(into, strip_option))]
    properties: Option<OwnedProperties>,
}

impl SubAck {
    pub fn builder() -> SubAckBuilder {
        SubAckBuilder::default()
    }
}

impl SubAckBuilder {
    pub fn build(self) -> Result<EncodedMessage, DecodeError> {
        let protocol_version = self
            .protocol_version
            .ok_or(DecodeError::ProtocolViolation("protocol_version is required"))?;
        let packet_id = self
            .packet_id
            .ok_or(DecodeError::ProtocolViolation("packet_id is required"))?;
        if packet_id == 0 {
            return Err(DecodeError::InvalidPacketId);
        }
        let reason_codes = self
            .reason_codes
            .ok_or(DecodeError::ProtocolViolation("at least one reason code is required"))?;
        if reason_codes.is_empty() {
            return Err(DecodeError::ProtocolViolation("at least one reason code is required"));
        }

        let dialect = Dialect::from_version(protocol_version);
        let properties = self.properties.flatten().unwrap_or_default();
        if !properties.is_empty() && dialect != Dialect::V5 {
            return Err(DecodeError::ProtocolViolation(
                "properties are only valid on the v5 dialect",
            ));
        }

        let mut body = Vec::new();
        write_u16_be(&mut body, packet_id);
        if dialect == Dialect::V5 {
            encode_properties(&mut body, &properties)?;
        }
        for code in &reason_codes {
            write_u8(&mut body, *code);
        }

        finish_fixed_flags(MessageType::SubAck, body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(pattern = "owned", setter(into), build_fn(skip))]
pub struct UnsubAck {
    protocol_version: ProtocolVersion,
    packet_id: u16,
    #[builder(setter(into, strip_option))]
    reason_codes: Option<Vec<u8>>,
    #[builder(setter(into, strip_option))]
    properties: Option<OwnedProperties>,
}

impl UnsubAck {
    pub fn builder() -> UnsubAckBuilder {
        UnsubAckBuilder::default()
    }
}

impl UnsubAckBuilder {
    pub fn build(self) -> Result<EncodedMessage, DecodeError> {
        let protocol_version = self
            .protocol_version
            .ok_or(DecodeError::ProtocolViolation("protocol_version is required"))?;
        let packet_id = self
            .packet_id
            .ok_or(DecodeError::ProtocolViolation("packet_id is required"))?;
        if packet_id == 0 {
            return Err(DecodeError::InvalidPacketId);
        }
        let dialect = Dialect::from_version(protocol_version);
        let reason_codes = self.reason_codes.flatten().unwrap_or_default();
        if dialect == Dialect::V3 && !reason_codes.is_empty() {
            return Err(DecodeError::ProtocolViolation(
                "v3.1.1 UNSUBACK carries no payload, reason codes are v5-only",
            ));
        }
        let properties = self.properties.flatten().unwrap_or_default();
        if !properties.is_empty() && dialect != Dialect::V5 {
            return Err(DecodeError::ProtocolViolation(
                "properties are only valid on the v5 dialect",
            ));
        }

        let mut body = Vec::new();
        write_u16_be(&mut body, packet_id);
        if dialect == Dialect::V5 {
            encode_properties(&mut body, &properties)?;
        }
        for code in &reason_codes {
            write_u8(&mut body, *code);
        }

        finish_fixed_flags(MessageType::UnsubAck, body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(pattern = "owned", setter(into), build_fn(skip))]
pub struct Disconnect {
    protocol_version: ProtocolVersion,
    #[builder(setter(into, strip_option))]
    reason_code: Option<u8>,
    #[builder(setter(into, strip_option))]
    properties: Option<OwnedProperties>,
}

impl Disconnect {
    pub fn builder() -> DisconnectBuilder {
        DisconnectBuilder::default()
    }
}

impl DisconnectBuilder {
    pub fn build(self) -> Result<EncodedMessage, DecodeError> {
        let protocol_version = self
            .protocol_version
            .ok_or(DecodeError::ProtocolViolation("protocol_version is required"))?;
        let dialect = Dialect::from_version(protocol_version);
        let reason_code = self.reason_code.flatten().unwrap_or(0);
        let properties = self.properties.flatten().unwrap_or_default();

        let mut body = Vec::new();
        if dialect == Dialect::V5 && (reason_code != 0 || !properties.is_empty()) {
            write_u8(&mut body, reason_code);
            if !properties.is_empty() {
                encode_properties(&mut body, &properties)?;
            }
        }

        finish_fixed_flags(MessageType::Disconnect, body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(pattern = "owned", setter(into), build_fn(skip))]
pub struct Auth {
    protocol_version: ProtocolVersion,
    #[builder(setter(into, strip_option))]
    reason_code: Option<u8>,
    #[builder(setter(into, strip_option))]
    properties: Option<OwnedProperties>,
}

impl Auth {
    pub fn builder() -> AuthBuilder {
        AuthBuilder::default()
    }
}

impl AuthBuilder {
    pub fn build(self) -> Result<EncodedMessage, DecodeError> {
        let protocol_version = self
            .protocol_version
            .ok_or(DecodeError::ProtocolViolation("protocol_version is required"))?;
        if protocol_version != ProtocolVersion::V5 {
            return Err(DecodeError::ProtocolViolation("AUTH is not defined in the v3 dialect"));
        }
        let reason_code = self.reason_code.flatten().unwrap_or(0);
        let properties = self.properties.flatten().unwrap_or_default();

        let mut body = Vec::new();
        if reason_code != 0 || !properties.is_empty() {
            write_u8(&mut body, reason_code);
            if !properties.is_empty() {
                encode_properties(&mut body, &properties)?;
            }
        }

        finish_fixed_flags(MessageType::Auth, body)
    }
}

macro_rules! pub_reply_builder {
    ($struct_name:ident, $builder_name:ident, $message_type:expr) => {
        #[derive(Debug, Clone, PartialEq, Eq, Builder)]
        #[builder(pattern = "owned", setter(into), build_fn(skip))]
        pub struct $struct_name {
            protocol_version: ProtocolVersion,
            packet_id: u16,
            #[builder(setter(into, strip_option))]
            reason_code: Option<u8>,
            #[builder(setter(into, strip_option))]
            properties: Option<OwnedProperties>,
        }

        impl $struct_name {
            pub fn builder() -> $builder_name {
                $builder_name::default()
            }
        }

        impl $builder_name {
            pub fn build(self) -> Result<EncodedMessage, DecodeError> {
                let protocol_version = self
                    .protocol_version
                    .ok_or(DecodeError::ProtocolViolation("protocol_version is required"))?;
                let packet_id = self
                    .packet_id
                    .ok_or(DecodeError::ProtocolViolation("packet_id is required"))?;
                if packet_id == 0 {
                    return Err(DecodeError::InvalidPacketId);
                }
                let dialect = Dialect::from_version(protocol_version);
                let reason_code = self.reason_code.flatten().unwrap_or(0);
                let properties = self.properties.flatten().unwrap_or_default();

                let mut body = Vec::new();
                write_u16_be(&mut body, packet_id);
                if dialect == Dialect::V5 && (reason_code != 0 || !properties.is_empty()) {
                    write_u8(&mut body, reason_code);
                    if !properties.is_empty() {
                        encode_properties(&mut body, &properties)?;
                    }
                }

                finish_fixed_flags($message_type, body)
            }
        }
    };
}

pub_reply_builder!(PubAck, PubAckBuilder, MessageType::PubAck);
pub_reply_builder!(PubRec, PubRecBuilder, MessageType::PubRec);
pub_reply_builder!(PubRel, PubRelBuilder, MessageType::PubRel);
pub_reply_builder!(PubComp, PubCompBuilder, MessageType::PubComp);

/// PINGREQ carries no variable header or payload at all; a builder would add
/// nothing over a plain function.
pub fn ping_req() -> EncodedMessage {
    finish_fixed_flags(MessageType::PingReq, Vec::new()).expect("PINGREQ always fits")
}

/// PINGRESP, likewise.
pub fn ping_resp() -> EncodedMessage {
    finish_fixed_flags(MessageType::PingResp, Vec::new()).expect("PINGRESP always fits")
}

//! Per-packet-type variable-header shapes (§3). One struct per shape rather
//! than per {version, type} pair — v3.1.1 and v5 share a struct and simply
//! leave `properties` empty on the v3 side, matching the "unified tagged
//! variant" re-architecture called out in spec.md §9.

use crate::mqtt::packet::property::Properties;
use crate::mqtt::packet::qos::Qos;
use getset::{CopyGetters, Getters};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters, CopyGetters)]
pub struct ConnectVariableHeader<'a> {
    #[getset(get_copy = "pub")]
    pub protocol_name: &'a str,
    #[getset(get_copy = "pub")]
    pub protocol_level: u8,
    #[getset(get_copy = "pub")]
    pub has_user_name: bool,
    #[getset(get_copy = "pub")]
    pub has_password: bool,
    #[getset(get_copy = "pub")]
    pub will_retain: bool,
    #[getset(get_copy = "pub")]
    pub will_qos: Qos,
    #[getset(get_copy = "pub")]
    pub will_flag: bool,
    #[getset(get_copy = "pub")]
    pub clean_session: bool,
    #[getset(get_copy = "pub")]
    pub keep_alive_secs: u16,
    #[getset(get = "pub")]
    pub properties: Properties<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters, CopyGetters)]
pub struct ConnAckVariableHeader<'a> {
    #[getset(get_copy = "pub")]
    pub return_code: u8,
    #[getset(get_copy = "pub")]
    pub session_present: bool,
    #[getset(get = "pub")]
    pub properties: Properties<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters, CopyGetters)]
pub struct PublishVariableHeader<'a> {
    #[getset(get_copy = "pub")]
    pub topic_name: &'a str,
    /// `None` iff QoS 0 — QoS ≥ 1 PUBLISH always carries a packet id.
    #[getset(get_copy = "pub")]
    pub packet_id: Option<u16>,
    #[getset(get = "pub")]
    pub properties: Properties<'a>,
}

/// v3 PUBACK/PUBREC/PUBREL/PUBCOMP/SUBSCRIBE/SUBACK/UNSUBSCRIBE/UNSUBACK and
/// v5 UNSUBSCRIBE: nothing but a packet identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, CopyGetters)]
pub struct MessageIdVariableHeader {
    #[getset(get_copy = "pub")]
    pub packet_id: u16,
}

/// v5 SUBSCRIBE/SUBACK/UNSUBACK: packet identifier plus a properties block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters, CopyGetters)]
pub struct MessageIdPlusPropertiesVariableHeader<'a> {
    #[getset(get_copy = "pub")]
    pub packet_id: u16,
    #[getset(get = "pub")]
    pub properties: Properties<'a>,
}

/// v5 PUBACK/PUBREC/PUBREL/PUBCOMP: packet identifier, reason code, properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters, CopyGetters)]
pub struct PubReplyVariableHeader<'a> {
    #[getset(get_copy = "pub")]
    pub packet_id: u16,
    #[getset(get_copy = "pub")]
    pub reason_code: u8,
    #[getset(get = "pub")]
    pub properties: Properties<'a>,
}

/// v5 DISCONNECT/AUTH: a reason code plus a properties block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters, CopyGetters)]
pub struct ReasonCodePlusPropertiesVariableHeader<'a> {
    #[getset(get_copy = "pub")]
    pub reason_code: u8,
    #[getset(get = "pub")]
    pub properties: Properties<'a>,
}

/// The tagged variable-header variant the assembler branches on (§9:
/// replaces any unsafe upcast/downcast of a heterogeneous decoder result).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum VariableHeader<'a> {
    Connect(ConnectVariableHeader<'a>),
    ConnAck(ConnAckVariableHeader<'a>),
    Publish(PublishVariableHeader<'a>),
    MessageId(MessageIdVariableHeader),
    MessageIdPlusProperties(MessageIdPlusPropertiesVariableHeader<'a>),
    PubReply(PubReplyVariableHeader<'a>),
    ReasonCodePlusProperties(ReasonCodePlusPropertiesVariableHeader<'a>),
    /// PINGREQ, PINGRESP, and v3.1.1 DISCONNECT carry no variable header at all.
    Empty,
}

impl<'a> VariableHeader<'a> {
    pub fn properties(&self) -> &[crate::mqtt::packet::property::Property<'a>] {
        match self {
            VariableHeader::Connect(vh) => &vh.properties,
            VariableHeader::ConnAck(vh) => &vh.properties,
            VariableHeader::Publish(vh) => &vh.properties,
            VariableHeader::MessageIdPlusProperties(vh) => &vh.properties,
            VariableHeader::PubReply(vh) => &vh.properties,
            VariableHeader::ReasonCodePlusProperties(vh) => &vh.properties,
            VariableHeader::MessageId(_) | VariableHeader::Empty => &[],
        }
    }

    pub fn packet_id(&self) -> Option<u16> {
        match self {
            VariableHeader::Publish(vh) => vh.packet_id,
            VariableHeader::MessageId(vh) => Some(vh.packet_id),
            VariableHeader::MessageIdPlusProperties(vh) => Some(vh.packet_id),
            VariableHeader::PubReply(vh) => Some(vh.packet_id),
            _ => None,
        }
    }
}

//! Packet-level types: the fixed header, the MQTT 5 property codec, the
//! per-dialect variable-header shapes, payload shapes, and the tagged
//! `Message` envelope the assembler emits.

pub mod dialect;
pub mod fixed_header;
pub mod message;
pub mod packet_type;
pub mod payload;
pub mod primitive;
pub mod property;
pub mod qos;
pub mod retain_handling;
pub mod subscription;
pub mod variable_byte_integer;
pub mod variable_header;

pub use dialect::Dialect;
pub use fixed_header::FixedHeader;
pub use message::Message;
pub use packet_type::MessageType;
pub use payload::{
    ConnectPayload, Payload, SubAckPayload, SubscribePayload, UnsubAckPayload, UnsubscribePayload,
};
pub use property::{Properties, Property, PropertyId};
pub use qos::Qos;
pub use retain_handling::RetainHandling;
pub use subscription::SubscriptionOptions;
pub use variable_byte_integer::VariableByteInteger;
pub use variable_header::{
    ConnAckVariableHeader, ConnectVariableHeader, MessageIdPlusPropertiesVariableHeader,
    MessageIdVariableHeader, PubReplyVariableHeader, PublishVariableHeader,
    ReasonCodePlusPropertiesVariableHeader, VariableHeader,
};

//! The MQTT protocol core: fixed/variable header and payload codecs, the
//! property block, the resumable message assembler, and outbound message
//! builders. Everything here is sans-I/O — no sockets, no timers, no
//! session or subscription state (those are left to whatever transport and
//! broker/client logic sits on top of this crate).

pub mod builder;
pub mod common;
pub mod decoder;
pub mod packet;
pub mod result_code;
pub mod version;

pub use decoder::{Decoded, DecoderConfig, MessageAssembler};
pub use packet::Dialect;
pub use result_code::{DecodeError, ReasonCode};
pub use version::ProtocolVersion;

/// Re-exports the common entry points: the assembler, the dialect and
/// version types, the error taxonomy, and the message/builder types.
pub mod prelude {
    pub use crate::mqtt::builder::{
        Auth, AuthBuilder, ConnAck, ConnAckBuilder, Connect, ConnectBuilder, Disconnect,
        DisconnectBuilder, EncodedMessage, OwnedProperty, PubAck, PubAckBuilder, PubComp,
        PubCompBuilder, PubRec, PubRecBuilder, PubRel, PubRelBuilder, Publish, PublishBuilder,
        SubAck, SubAckBuilder, Subscribe, SubscribeBuilder, UnsubAck, UnsubAckBuilder, Unsubscribe,
        UnsubscribeBuilder,
    };
    pub use crate::mqtt::builder::{ping_req, ping_resp};
    pub use crate::mqtt::decoder::{Decoded, DecoderConfig, MessageAssembler};
    pub use crate::mqtt::packet::{Dialect, Message, MessageType, Qos, SubscriptionOptions};
    pub use crate::mqtt::result_code::{DecodeError, ReasonCode};
    pub use crate::mqtt::version::ProtocolVersion;
}

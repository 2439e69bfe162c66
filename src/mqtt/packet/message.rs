//! The assembled message envelope (§3, §6): a fixed header paired with its
//! dialect-decoded variable header and payload. This is the single tagged
//! value the assembler emits — no per-{version,type} struct, no downcast.

use crate::mqtt::packet::fixed_header::FixedHeader;
use crate::mqtt::packet::packet_type::MessageType;
use crate::mqtt::packet::payload::Payload;
use crate::mqtt::packet::variable_header::VariableHeader;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message<'a> {
    pub fixed_header: FixedHeader,
    pub variable_header: VariableHeader<'a>,
    pub payload: Payload<'a>,
}

impl<'a> Message<'a> {
    pub fn message_type(&self) -> MessageType {
        self.fixed_header.message_type
    }
}

impl<'a> core::fmt::Display for Message<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{json}"),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}

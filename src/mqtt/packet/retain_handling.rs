use core::fmt;
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

/// v5 SUBSCRIBE retain-handling option (bits 4-5 of the subscription
/// options byte). v3 subscriptions have no such concept.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum RetainHandling {
    SendAtSubscribe = 0,
    SendAtSubscribeIfNotYetExists = 1,
    DontSendAtSubscribe = 2,
}

impl fmt::Display for RetainHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SendAtSubscribe => "SendAtSubscribe",
            Self::SendAtSubscribeIfNotYetExists => "SendAtSubscribeIfNotYetExists",
            Self::DontSendAtSubscribe => "DontSendAtSubscribe",
        };
        write!(f, "{s}")
    }
}

impl Default for RetainHandling {
    fn default() -> Self {
        RetainHandling::SendAtSubscribe
    }
}

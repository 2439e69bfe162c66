use core::fmt;
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

/// MQTT Quality of Service levels. Wire value 3 is invalid and never
/// constructible through `TryFrom<u8>`.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, TryFromPrimitive,
)]
#[repr(u8)]
pub enum Qos {
    AtMostOnce = 0,
    AtLeastOnce = 1,
    ExactlyOnce = 2,
}

impl fmt::Display for Qos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::AtMostOnce => "AtMostOnce",
            Self::AtLeastOnce => "AtLeastOnce",
            Self::ExactlyOnce => "ExactlyOnce",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_value_three_is_invalid() {
        assert!(Qos::try_from(3u8).is_err());
    }

    #[test]
    fn ordering_follows_delivery_strength() {
        assert!(Qos::AtMostOnce < Qos::AtLeastOnce);
        assert!(Qos::AtLeastOnce < Qos::ExactlyOnce);
    }
}

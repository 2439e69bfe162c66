//! Protocol version resolution from CONNECT's protocol name and level
//! (§4.3). MQTT 3.1 uses the "MQIsdp"/3 pair; 3.1.1 and 5 both use "MQTT"
//! and are told apart only by the level byte.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVersion {
    V3_1,
    V3_1_1,
    V5,
}

impl ProtocolVersion {
    pub fn protocol_name(self) -> &'static str {
        match self {
            ProtocolVersion::V3_1 => "MQIsdp",
            ProtocolVersion::V3_1_1 => "MQTT",
            ProtocolVersion::V5 => "MQTT",
        }
    }

    pub fn level(self) -> u8 {
        match self {
            ProtocolVersion::V3_1 => 3,
            ProtocolVersion::V3_1_1 => 4,
            ProtocolVersion::V5 => 5,
        }
    }

    pub fn from_name_and_level(name: &str, level: u8) -> Option<Self> {
        match (name, level) {
            ("MQIsdp", 3) => Some(ProtocolVersion::V3_1),
            ("MQTT", 4) => Some(ProtocolVersion::V3_1_1),
            ("MQTT", 5) => Some(ProtocolVersion::V5),
            _ => None,
        }
    }

    /// Whether this version's variable headers carry an MQTT 5 properties
    /// block. The v3.1 and v3.1.1 wire formats are otherwise identical.
    pub fn has_properties(self) -> bool {
        matches!(self, ProtocolVersion::V5)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProtocolVersion::V3_1 => "3.1",
            ProtocolVersion::V3_1_1 => "3.1.1",
            ProtocolVersion::V5 => "5.0",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_name_level_pairs() {
        assert_eq!(
            ProtocolVersion::from_name_and_level("MQIsdp", 3),
            Some(ProtocolVersion::V3_1)
        );
        assert_eq!(
            ProtocolVersion::from_name_and_level("MQTT", 4),
            Some(ProtocolVersion::V3_1_1)
        );
        assert_eq!(
            ProtocolVersion::from_name_and_level("MQTT", 5),
            Some(ProtocolVersion::V5)
        );
    }

    #[test]
    fn rejects_unknown_pairs() {
        assert_eq!(ProtocolVersion::from_name_and_level("MQTT", 3), None);
        assert_eq!(ProtocolVersion::from_name_and_level("mqtt", 4), None);
    }

    #[test]
    fn only_v5_carries_properties() {
        assert!(!ProtocolVersion::V3_1_1.has_properties());
        assert!(ProtocolVersion::V5.has_properties());
    }
}

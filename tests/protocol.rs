// MIT License
//
// Copyright (c) 2025 Takatoshi Kondo
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

#[cfg(feature = "tracing")]
use mqtt_codec_core::logger;
use mqtt_codec_core::mqtt::prelude::*;

fn init() {
    #[cfg(feature = "tracing")]
    logger::init(tracing::Level::TRACE);
}

#[test]
fn v3_1_1_connect_with_client_id_test() {
    init();
    let bytes = [
        0x10u8, 0x10, 0x00, 0x04, 0x4D, 0x51, 0x54, 0x54, 0x04, 0x02, 0x00, 0x3C, 0x00, 0x04, 0x74, 0x65, 0x73,
        0x74,
    ];
    let mut assembler = MessageAssembler::new(DecoderConfig::new(Dialect::V3));
    match assembler.poll(&bytes) {
        Decoded::Message { message, consumed } => {
            assert_eq!(consumed, bytes.len());
            assert_eq!(message.message_type(), MessageType::Connect);
            match message.payload {
                mqtt_codec_core::mqtt::packet::Payload::Connect(p) => assert_eq!(p.client_id, "test"),
                other => panic!("expected Connect payload, got {other:?}"),
            }
        }
        other => panic!("expected Message, got {other:?}"),
    }
}

#[test]
fn v3_1_1_publish_qos0_topic_a_b() {
    init();
    let bytes = [0x30u8, 0x06, 0x00, 0x03, 0x61, 0x2F, 0x62, 0xFF];
    let mut assembler = MessageAssembler::new(DecoderConfig::new(Dialect::V3));
    match assembler.poll(&bytes) {
        Decoded::Message { message, .. } => {
            assert_eq!(message.fixed_header.qos, Qos::AtMostOnce);
            assert!(!message.fixed_header.dup);
            assert!(!message.fixed_header.retain);
            match message.payload {
                mqtt_codec_core::mqtt::packet::Payload::Publish(bytes) => assert_eq!(bytes, &[0xFF]),
                other => panic!("expected Publish payload, got {other:?}"),
            }
        }
        other => panic!("expected Message, got {other:?}"),
    }
}

#[test]
fn v3_1_1_subscribe_two_filters() {
    init();
    let bytes = [
        0x82u8, 0x0A, 0x00, 0x0A, 0x00, 0x01, 0x78, 0x01, 0x00, 0x03, 0x79, 0x2F, 0x23, 0x02,
    ];
    let mut assembler = MessageAssembler::new(DecoderConfig::new(Dialect::V3));
    match assembler.poll(&bytes) {
        Decoded::Message { message, .. } => {
            assert_eq!(message.variable_header.packet_id(), Some(10));
            match message.payload {
                mqtt_codec_core::mqtt::packet::Payload::Subscribe(p) => {
                    assert_eq!(p.filters.len(), 2);
                    assert_eq!(p.filters[0].0, "x");
                    assert_eq!(p.filters[0].1.qos, Qos::AtLeastOnce);
                    assert_eq!(p.filters[1].0, "y/#");
                    assert_eq!(p.filters[1].1.qos, Qos::ExactlyOnce);
                }
                other => panic!("expected Subscribe payload, got {other:?}"),
            }
        }
        other => panic!("expected Message, got {other:?}"),
    }
}

#[test]
fn v5_disconnect_default_reason_and_empty_properties() {
    init();
    let bytes = [0xE0u8, 0x02, 0x00, 0x00];
    let mut assembler = MessageAssembler::new(DecoderConfig::new(Dialect::V5));
    match assembler.poll(&bytes) {
        Decoded::Message { message, .. } => {
            assert_eq!(message.message_type(), MessageType::Disconnect);
            match message.variable_header {
                mqtt_codec_core::mqtt::packet::VariableHeader::ReasonCodePlusProperties(vh) => {
                    assert_eq!(vh.reason_code, 0);
                    assert!(vh.properties.is_empty());
                }
                other => panic!("expected ReasonCodePlusProperties variable header, got {other:?}"),
            }
        }
        other => panic!("expected Message, got {other:?}"),
    }
}

#[test]
fn v5_publish_qos1_with_topic_alias_property() {
    init();
    let bytes = [
        0x32u8, 0x0A, 0x00, 0x01, 0x74, 0x00, 0x01, 0x03, 0x23, 0x00, 0x05, 0xAA,
    ];
    let mut assembler = MessageAssembler::new(DecoderConfig::new(Dialect::V5));
    match assembler.poll(&bytes) {
        Decoded::Message { message, .. } => {
            assert_eq!(message.fixed_header.qos, Qos::AtLeastOnce);
            match message.variable_header {
                mqtt_codec_core::mqtt::packet::VariableHeader::Publish(vh) => {
                    assert_eq!(vh.topic_name, "t");
                    assert_eq!(vh.packet_id, Some(1));
                    assert_eq!(vh.properties.len(), 1);
                    assert_eq!(
                        vh.properties[0].as_u32(),
                        Some(5),
                        "TopicAlias should decode as an Integer property"
                    );
                }
                other => panic!("expected Publish variable header, got {other:?}"),
            }
            match message.payload {
                mqtt_codec_core::mqtt::packet::Payload::Publish(bytes) => assert_eq!(bytes, &[0xAA]),
                other => panic!("expected Publish payload, got {other:?}"),
            }
        }
        other => panic!("expected Message, got {other:?}"),
    }
}

#[test]
fn v3_1_1_connect_with_reserved_bit_set_is_rejected() {
    init();
    let bytes = [
        0x10u8, 0x0E, 0x00, 0x04, 0x4D, 0x51, 0x54, 0x54, 0x04, 0x03, 0x00, 0x3C, 0x00, 0x02, 0x69, 0x64,
    ];
    let mut assembler = MessageAssembler::new(DecoderConfig::new(Dialect::V3));
    match assembler.poll(&bytes) {
        Decoded::Invalid { cause, consumed } => {
            assert_eq!(cause, DecodeError::ReservedFlagsViolation);
            assert_eq!(consumed, bytes.len());
        }
        other => panic!("expected Invalid(ReservedFlagsViolation), got {other:?}"),
    }
    assert!(assembler.is_discarding());
}

#[test]
fn builder_round_trips_through_assembler_at_both_dialects() {
    init();
    for (version, dialect) in [
        (ProtocolVersion::V3_1_1, Dialect::V3),
        (ProtocolVersion::V5, Dialect::V5),
    ] {
        let encoded = Subscribe::builder()
            .protocol_version(version)
            .packet_id(42u16)
            .filters(vec![("a/b".to_string(), SubscriptionOptions::new(Qos::AtLeastOnce))])
            .build()
            .unwrap();
        let mut assembler = MessageAssembler::new(DecoderConfig::new(dialect));
        match assembler.poll(encoded.as_bytes()) {
            Decoded::Message { message, consumed } => {
                assert_eq!(consumed, encoded.as_bytes().len());
                assert_eq!(message.variable_header.packet_id(), Some(42));
            }
            other => panic!("expected Message for {version:?}, got {other:?}"),
        }
    }
}

#[test]
fn wildcard_subscribe_filter_itself_is_not_rejected_but_publish_topic_is() {
    init();
    // Wildcards are only rejected for PUBLISH topic names (§8 property 6);
    // SUBSCRIBE filters are expected to contain them.
    let encoded = Publish::builder()
        .protocol_version(ProtocolVersion::V3_1_1)
        .topic_name("a/#".to_string())
        .build();
    assert!(encoded.is_err());

    let encoded = Subscribe::builder()
        .protocol_version(ProtocolVersion::V3_1_1)
        .packet_id(1u16)
        .filters(vec![("y/#".to_string(), SubscriptionOptions::new(Qos::ExactlyOnce))])
        .build()
        .unwrap();
    let mut assembler = MessageAssembler::new(DecoderConfig::new(Dialect::V3));
    match assembler.poll(encoded.as_bytes()) {
        Decoded::Message { message, .. } => match message.payload {
            mqtt_codec_core::mqtt::packet::Payload::Subscribe(p) => {
                assert_eq!(p.filters, vec![("y/#", SubscriptionOptions::new(Qos::ExactlyOnce))]);
            }
            other => panic!("expected Subscribe payload, got {other:?}"),
        },
        other => panic!("expected Message, got {other:?}"),
    }
}

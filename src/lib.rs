#![cfg_attr(not(feature = "std"), no_std)]

//! # mqtt-codec-core
//!
//! A sans-I/O MQTT v3.1.1 / v5.0 wire codec: a resumable decoder and a set
//! of outbound message builders, with no socket, timer, session, or
//! subscription state of its own.
//!
//! ## Quick start
//!
//! ```
//! use mqtt_codec_core::mqtt::prelude::*;
//!
//! let mut assembler = MessageAssembler::new(DecoderConfig::for_version(ProtocolVersion::V5));
//!
//! let encoded = Connect::builder()
//!     .protocol_version(ProtocolVersion::V5)
//!     .client_id("my-client")
//!     .clean_session(true)
//!     .build()
//!     .unwrap();
//!
//! match assembler.poll(encoded.as_bytes()) {
//!     Decoded::Message { message, .. } => {
//!         assert_eq!(message.message_type(), MessageType::Connect);
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`mqtt::decoder`] - the resumable [`mqtt::decoder::MessageAssembler`] state machine
//! - [`mqtt::packet`] - fixed header, properties, variable headers, payloads, the `Message` envelope
//! - [`mqtt::builder`] - fluent constructors that encode straight to wire bytes
//! - [`mqtt::version`] - protocol version resolution (MQIsdp/3, MQTT/4, MQTT/5)
//! - [`mqtt::result_code`] - the decode error taxonomy and the v5 reason-code space
//!
//! ## Sans-I/O pattern
//!
//! The assembler never touches a socket. Hand it whatever bytes you have
//! buffered; it tells you whether that was enough:
//!
//! ```
//! use mqtt_codec_core::mqtt::prelude::*;
//!
//! let mut assembler = MessageAssembler::new(DecoderConfig::new(Dialect::V3));
//! match assembler.poll(&[0x10, 0x00][..1]) {
//!     Decoded::NeedMoreData => {}
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```
//!
//! ## No-std support
//!
//! Disable the default `std` feature to build for `no_std` + `alloc`
//! targets:
//!
//! ```toml
//! [dependencies]
//! mqtt-codec-core = { version = "0.1", default-features = false }
//! ```
//!
//! ## Feature flags
//!
//! - **`std`** (default): standard library support.
//! - **`tracing`**: structured trace/debug/warn/error logging via the
//!   `tracing` crate, plus [`logger::init`] for a one-shot
//!   `tracing-subscriber` setup. When disabled, logging calls compile to
//!   no-ops with zero overhead.

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

// Always use alloc types for consistency between std and no-std
#[macro_use]
extern crate alloc;

// Common prelude with alloc types
pub mod prelude {
    pub use alloc::{boxed::Box, format, string::String, vec, vec::Vec};

    #[cfg(feature = "std")]
    pub use std::io::IoSlice;
}

#[cfg(feature = "tracing")]
pub mod logger;

pub mod mqtt;

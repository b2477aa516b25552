//! IOP Protocol Library
//!
//! This crate provides encoding and decoding for the IOP console protocol
//! spoken by a USB DAC accessory behind a CP2615-style serial bridge:
//!
//! - **Frame encoding**: preamble, derived length, message id, payload and
//!   checksum-like trailer built from hex-string tokens
//! - **Attenuation mapping**: 0-79 dB levels to the coarse/fine register
//!   pair the device expects, with bounded step adjustments
//! - **Stream segmentation**: raw serial text split into labeled
//!   8-character fields for monitor display
//! - **Wire codec**: device-side byte framing (preamble scan plus length
//!   prefix) for simulators and tests
//! - **Canned commands**: the fixed volume-register and LED frames
//!
//! # Architecture
//!
//! Tokens stay text until the last moment. The console edits hex-string
//! fields, [`frame::IopFrame`] validates and completes them, and only the
//! link layer serializes tokens to bytes. In the other direction received
//! bytes are rendered as fixed-width hex words, so the monitor side works
//! on text too and [`display::segment`] never sees raw bytes.
//!
//! # Example
//!
//! ```rust
//! use iop_protocol::display::{segment, FieldLabel};
//! use iop_protocol::frame::IopFrame;
//! use iop_protocol::hex::dump_bytes;
//!
//! let frame = IopFrame::compose("1A", "0", &["0A", "14"]).unwrap();
//! assert_eq!(
//!     frame.tokens(),
//!     vec!["2A", "2A", "0", "9", "1A", "0", "0A", "14", "1e"]
//! );
//!
//! // An echoed frame comes back as one 8-hex-char word per byte
//! let echoed = dump_bytes(&frame.wire_bytes());
//! let chunks = segment(&echoed);
//! assert_eq!(chunks.len(), 9);
//! assert_eq!(chunks[6].label, FieldLabel::Payload(0));
//! ```

pub mod attenuation;
pub mod device;
pub mod display;
pub mod error;
pub mod frame;
pub mod hex;
pub mod wire;

pub use attenuation::{Attenuation, RegisterPair, Step};
pub use device::{DeviceCommand, LedColor};
pub use display::{render, segment, FieldLabel, LabeledChunk};
pub use error::{AttenuationError, FrameError, TokenError};
pub use frame::IopFrame;
pub use wire::{IopCodec, WireMessage};

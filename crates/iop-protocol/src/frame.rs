//! IOP console frame encoding
//!
//! IOP messages are the framed commands sent to the DAC accessory. The raw
//! console builds them field by field from operator input.
//!
//! # Frame Format
//! ```text
//! 2A 2A [len msb] [len lsb] [id msb] [id lsb] [payload...] [trailer]
//! ```
//!
//! - `2A 2A`: Preamble (two fields)
//! - `len msb`: Always "0", the protocol carries short messages only
//! - `len lsb`: Total frame length: 6 header fields + payload count + 1 trailer
//! - `id msb`/`id lsb`: Message id, "0" when the operator leaves it blank
//! - `payload`: Up to seven operator-supplied hex fields
//! - `trailer`: Hex sum of the payload field values
//!
//! Fields stay hex text end to end. The console emits tokens; serialization
//! to one wire byte per token happens at the link layer, and derived fields
//! above 0xFF keep their full width here and truncate there.

use crate::error::TokenError;
use crate::hex;

/// Preamble token, the first two fields of every frame
pub const PREAMBLE_TOKEN: &str = "2A";
/// Preamble byte value on the wire
pub const PREAMBLE: u8 = 0x2A;
/// Header fields before the payload: preamble, length, message id
pub const HEADER_LEN: usize = 6;
/// Payload slots on the console form
pub const MAX_PAYLOAD_FIELDS: usize = 7;
/// Bulk report size of the USB bridge; outgoing frames are zero-padded to this
pub const REPORT_LEN: usize = 64;

/// A validated hex field: the operator's text plus its parsed value
#[derive(Debug, Clone, PartialEq, Eq)]
struct Field {
    text: String,
    value: u32,
}

impl Field {
    fn parse(text: &str) -> Result<Self, TokenError> {
        let value = hex::parse_token(text)?;
        Ok(Self {
            text: text.to_string(),
            value,
        })
    }
}

/// An outgoing IOP frame built from console fields
///
/// Construction validates every field, so a frame that exists is always
/// sendable; the token sequence and wire bytes are derived on demand.
/// Operator-supplied tokens keep their original spelling ("0A" stays "0A"),
/// while derived fields render as lowercase unpadded hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IopFrame {
    id_msb: Field,
    id_lsb: Field,
    payload: Vec<Field>,
}

impl IopFrame {
    /// Build a frame from the console form: two message id fields and up to
    /// seven payload slots
    ///
    /// Blank message id fields (after trimming) default to "0". Blank
    /// payload slots are skipped entirely, preserving the order of the
    /// remaining fields; they are never zero-filled. Any non-hex field
    /// fails the whole build before a frame exists.
    pub fn compose<S: AsRef<str>>(
        id_msb: &str,
        id_lsb: &str,
        slots: &[S],
    ) -> Result<Self, TokenError> {
        if slots.len() > MAX_PAYLOAD_FIELDS {
            return Err(TokenError::TooManyFields {
                count: slots.len(),
                limit: MAX_PAYLOAD_FIELDS,
            });
        }

        let id_msb = Field::parse(default_id(id_msb))?;
        let id_lsb = Field::parse(default_id(id_lsb))?;

        let mut payload = Vec::new();
        for slot in slots {
            let text = slot.as_ref();
            if !text.is_empty() {
                payload.push(Field::parse(text)?);
            }
        }

        Ok(Self {
            id_msb,
            id_lsb,
            payload,
        })
    }

    /// Message id tokens (msb, lsb)
    pub fn message_id(&self) -> (&str, &str) {
        (&self.id_msb.text, &self.id_lsb.text)
    }

    /// Payload tokens in slot order, trailer excluded
    pub fn payload_tokens(&self) -> Vec<&str> {
        self.payload.iter().map(|f| f.text.as_str()).collect()
    }

    /// Number of payload fields carried
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Sum of the payload field values, the basis of the trailer
    ///
    /// Kept at full width here; like every field, the trailer truncates to
    /// one byte only at wire serialization.
    pub fn payload_sum(&self) -> u64 {
        self.payload.iter().map(|f| u64::from(f.value)).sum()
    }

    /// The complete token sequence, ready for the transport layer
    pub fn tokens(&self) -> Vec<String> {
        let total = HEADER_LEN + self.payload.len() + 1;

        let mut tokens = Vec::with_capacity(total);
        tokens.push(PREAMBLE_TOKEN.to_string());
        tokens.push(PREAMBLE_TOKEN.to_string());
        tokens.push("0".to_string());
        tokens.push(hex::render_value(total as u64));
        tokens.push(self.id_msb.text.clone());
        tokens.push(self.id_lsb.text.clone());
        tokens.extend(self.payload.iter().map(|f| f.text.clone()));
        tokens.push(hex::render_value(self.payload_sum()));
        tokens
    }

    /// Wire bytes for this frame, one byte per token
    pub fn wire_bytes(&self) -> Vec<u8> {
        let total = HEADER_LEN + self.payload.len() + 1;

        let mut bytes = Vec::with_capacity(total);
        bytes.push(PREAMBLE);
        bytes.push(PREAMBLE);
        bytes.push(0x00);
        bytes.push(total as u8);
        bytes.push(self.id_msb.value as u8);
        bytes.push(self.id_lsb.value as u8);
        bytes.extend(self.payload.iter().map(|f| f.value as u8));
        bytes.push(self.payload_sum() as u8);
        bytes
    }
}

/// Message id fields fall back to "0" when left blank
fn default_id(text: &str) -> &str {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        "0"
    } else {
        trimmed
    }
}

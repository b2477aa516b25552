//! Hex token and hex dump helpers
//!
//! The DAC console protocol is text first: every frame field is a hex token
//! typed by the operator ("2A", "0A", "14") and every received byte is shown
//! back as fixed-width hex. This module holds the conversions between token
//! text, integer values, and wire bytes.

use crate::error::TokenError;

/// Number of hex characters one received byte occupies on the monitor
pub const WORD_WIDTH: usize = 8;

/// Parse a hex token ("0A", "1e", "d4") into its integer value
///
/// The token must be bare hex digits; whitespace and signs are format
/// errors, not stripped.
pub fn parse_token(token: &str) -> Result<u32, TokenError> {
    u32::from_str_radix(token, 16).map_err(|_| TokenError::InvalidHex(token.to_string()))
}

/// Render a value the way the console renders derived fields: lowercase,
/// no padding ("7", "1e")
pub fn render_value(value: u64) -> String {
    format!("{:x}", value)
}

/// Serialize console tokens to wire bytes, one byte per token
///
/// Values above 0xFF keep only their low byte; the bridge transfer carries
/// one byte per logical field.
pub fn tokens_to_bytes<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<u8>, TokenError> {
    tokens
        .iter()
        .map(|t| parse_token(t.as_ref()).map(|v| v as u8))
        .collect()
}

/// Render received bytes as the fixed-width hex string shown on the monitor
///
/// Each byte is zero-extended to 32 bits and rendered as exactly eight
/// uppercase hex characters ("000000D4"), so the monitor can be re-segmented
/// on fixed boundaries.
pub fn dump_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| format!("{:08X}", u32::from(b)))
        .collect()
}

/// Render 32-bit words as fixed-width monitor hex
pub fn dump_words(words: &[u32]) -> String {
    words.iter().map(|&w| format!("{:08X}", w)).collect()
}

//! Wire-level IOP frame extraction
//!
//! The device side of the link sees raw bytes, not console tokens. This
//! codec scans a byte stream for the 2A 2A preamble, reads the declared
//! length, and yields complete frames, skipping bridge report padding and
//! garbage between frames. The high length byte is always zero on this
//! protocol and is not consulted.

use crate::error::FrameError;
use crate::frame::{HEADER_LEN, PREAMBLE, REPORT_LEN};

/// Offset of the length LSB within a frame
const LENGTH_OFFSET: usize = 3;

/// A complete frame extracted from the wire
///
/// The payload carries every byte after the header; senders that append a
/// trailer leave it as the final payload byte, matching how the monitor
/// labels it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireMessage {
    /// Message id bytes (msb, lsb)
    pub message_id: [u8; 2],
    /// Payload bytes, trailer included when the sender appends one
    pub payload: Vec<u8>,
}

impl WireMessage {
    /// Declared wire length of this frame
    pub fn frame_len(&self) -> usize {
        HEADER_LEN + self.payload.len()
    }
}

/// Streaming decoder for IOP wire frames
pub struct IopCodec {
    buffer: Vec<u8>,
}

impl IopCodec {
    /// Create a new codec with an empty buffer
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(REPORT_LEN),
        }
    }

    /// Find the start of a frame (2A 2A sequence)
    fn find_preamble(&self) -> Option<usize> {
        self.buffer
            .windows(2)
            .position(|w| w[0] == PREAMBLE && w[1] == PREAMBLE)
    }

    /// Parse a complete frame
    fn parse_frame(frame: &[u8]) -> Result<WireMessage, FrameError> {
        if frame.len() < HEADER_LEN {
            return Err(FrameError::Incomplete {
                needed: HEADER_LEN - frame.len(),
            });
        }

        if frame[0] != PREAMBLE || frame[1] != PREAMBLE {
            return Err(FrameError::InvalidFrame("missing preamble".into()));
        }

        let declared = frame[LENGTH_OFFSET] as usize;
        if !(HEADER_LEN..=REPORT_LEN).contains(&declared) {
            return Err(FrameError::InvalidLength(frame[LENGTH_OFFSET]));
        }
        if declared != frame.len() {
            return Err(FrameError::InvalidFrame(format!(
                "declared length {} but frame is {} bytes",
                declared,
                frame.len()
            )));
        }

        Ok(WireMessage {
            message_id: [frame[4], frame[5]],
            payload: frame[HEADER_LEN..].to_vec(),
        })
    }

    /// Push raw bytes into the codec's buffer
    pub fn push_bytes(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);

        // Prevent unbounded growth between valid frames
        if self.buffer.len() > REPORT_LEN * 4 {
            let start = self.buffer.len() - REPORT_LEN;
            self.buffer = self.buffer[start..].to_vec();
        }
    }

    /// Try to extract the next complete frame from the buffer
    pub fn next_message(&mut self) -> Option<WireMessage> {
        self.next_message_with_bytes().map(|(msg, _)| msg)
    }

    /// Try to extract the next frame along with its raw bytes
    pub fn next_message_with_bytes(&mut self) -> Option<(WireMessage, Vec<u8>)> {
        loop {
            // Discard bytes before the preamble: report padding and noise
            let preamble_pos = self.find_preamble()?;
            if preamble_pos > 0 {
                self.buffer.drain(..preamble_pos);
            }

            // Wait for the length byte
            if self.buffer.len() <= LENGTH_OFFSET {
                return None;
            }

            let declared = self.buffer[LENGTH_OFFSET] as usize;
            if declared < HEADER_LEN || declared > REPORT_LEN {
                tracing::warn!("Discarding frame with invalid length {}", declared);
                // Resync past this preamble
                self.buffer.drain(..2);
                continue;
            }

            if self.buffer.len() < declared {
                return None;
            }

            let frame: Vec<u8> = self.buffer.drain(..declared).collect();
            match Self::parse_frame(&frame) {
                Ok(msg) => return Some((msg, frame)),
                Err(e) => {
                    tracing::warn!("Failed to parse IOP frame: {}", e);
                }
            }
        }
    }

    /// Clear the internal buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for IopCodec {
    fn default() -> Self {
        Self::new()
    }
}

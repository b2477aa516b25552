//! Monitor segmentation of incoming serial text
//!
//! The link layer renders every received byte as an eight-character hex
//! word and hands the concatenated text to the monitor. This module splits
//! that text back into fixed-width chunks and tags each one with the frame
//! field it occupies, for display only. Nothing here validates frames or
//! buffers partial input: the segmenter is a stateless view over whatever
//! text arrives, and restoring chunk boundaries on a fragmenting transport
//! is the transport's job.

use std::fmt;

/// Width of one rendered word on the monitor, in characters
pub const CHUNK_WIDTH: usize = 8;

/// Position where the payload section starts
const PAYLOAD_START: usize = 6;

/// Frame field a monitor chunk belongs to, by position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldLabel {
    /// Position 0
    PreambleMsb,
    /// Position 1
    PreambleLsb,
    /// Position 2
    LengthMsb,
    /// Position 3
    LengthLsb,
    /// Position 4
    MessageIdMsb,
    /// Position 5, the last header field before the payload section
    MessageIdLsb,
    /// Positions 6 and up, indexed from 0
    Payload(usize),
}

impl FieldLabel {
    /// Label for the chunk at a given position
    pub fn for_index(index: usize) -> Self {
        match index {
            0 => Self::PreambleMsb,
            1 => Self::PreambleLsb,
            2 => Self::LengthMsb,
            3 => Self::LengthLsb,
            4 => Self::MessageIdMsb,
            5 => Self::MessageIdLsb,
            i => Self::Payload(i - PAYLOAD_START),
        }
    }

    /// Whether this label belongs to the payload section
    pub fn is_payload(&self) -> bool {
        matches!(self, Self::Payload(_))
    }
}

impl fmt::Display for FieldLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreambleMsb => write!(f, "Preamble MSB"),
            Self::PreambleLsb => write!(f, "Preamble LSB"),
            Self::LengthMsb => write!(f, "Length MSB"),
            Self::LengthLsb => write!(f, "Length LSB"),
            Self::MessageIdMsb => write!(f, "Message ID MSB"),
            Self::MessageIdLsb => write!(f, "Message ID LSB"),
            Self::Payload(i) => write!(f, "Payload[{}]", i),
        }
    }
}

/// One fixed-width chunk of monitor text, tagged with its frame field
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabeledChunk {
    /// Raw chunk text; full width except for a shorter final chunk
    pub text: String,
    /// Positional field label
    pub label: FieldLabel,
}

/// Split raw monitor text into labeled fixed-width chunks
///
/// The final chunk keeps whatever characters remain when the input length
/// is not a multiple of the chunk width; it is never padded. Input shorter
/// than the header simply yields fewer chunks, and empty input yields none.
pub fn segment(raw: &str) -> Vec<LabeledChunk> {
    let chars: Vec<char> = raw.chars().collect();
    chars
        .chunks(CHUNK_WIDTH)
        .enumerate()
        .map(|(index, chunk)| LabeledChunk {
            text: chunk.iter().collect(),
            label: FieldLabel::for_index(index),
        })
        .collect()
}

/// Render labeled chunks as the text block the monitor appends
///
/// One line per chunk in `chunk --label` form, with a PAYLOAD divider after
/// the message id so the operator can see where the header ends. The block
/// is meant to be appended to a scrolling transcript, never to replace it.
pub fn render(chunks: &[LabeledChunk]) -> String {
    let mut out = String::new();
    for chunk in chunks {
        out.push('\n');
        out.push_str(&chunk.text);
        out.push_str(" --");
        out.push_str(&chunk.label.to_string());
        if chunk.label == FieldLabel::MessageIdLsb {
            out.push_str("\n\nPAYLOAD");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_position() {
        assert_eq!(FieldLabel::for_index(0), FieldLabel::PreambleMsb);
        assert_eq!(FieldLabel::for_index(5), FieldLabel::MessageIdLsb);
        assert_eq!(FieldLabel::for_index(6), FieldLabel::Payload(0));
        assert_eq!(FieldLabel::for_index(9), FieldLabel::Payload(3));
    }

    #[test]
    fn label_text_matches_monitor_wording() {
        assert_eq!(FieldLabel::PreambleMsb.to_string(), "Preamble MSB");
        assert_eq!(FieldLabel::MessageIdLsb.to_string(), "Message ID LSB");
        assert_eq!(FieldLabel::Payload(2).to_string(), "Payload[2]");
    }

    #[test]
    fn fifty_chars_yield_six_full_chunks_and_a_short_payload() {
        let raw = "A".repeat(50);
        let chunks = segment(&raw);

        assert_eq!(chunks.len(), 7);
        for chunk in &chunks[..6] {
            assert_eq!(chunk.text.len(), CHUNK_WIDTH);
        }
        assert_eq!(chunks[6].text.len(), 2);
        assert_eq!(chunks[6].label, FieldLabel::Payload(0));
    }

    #[test]
    fn short_input_omits_missing_fields() {
        // 20 chars: two full chunks plus a 4-char remainder, nothing padded
        let chunks = segment(&"B".repeat(20));
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].text.len(), 4);
        assert_eq!(chunks[2].label, FieldLabel::LengthMsb);
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(segment("").is_empty());
    }

    #[test]
    fn exact_header_has_no_payload_chunks() {
        let chunks = segment(&"C".repeat(48));
        assert_eq!(chunks.len(), 6);
        assert!(chunks.iter().all(|c| !c.label.is_payload()));
    }

    #[test]
    fn chunk_text_preserves_input_order() {
        let chunks = segment("0000002A0000002B");
        assert_eq!(chunks[0].text, "0000002A");
        assert_eq!(chunks[1].text, "0000002B");
        assert_eq!(chunks[1].label, FieldLabel::PreambleLsb);
    }

    #[test]
    fn render_marks_payload_section_after_message_id() {
        let chunks = segment(&"D".repeat(56));
        let block = render(&chunks);

        assert!(block.contains("DDDDDDDD --Message ID LSB\n\nPAYLOAD"));
        assert!(block.contains("DDDDDDDD --Payload[0]"));
        assert!(block.starts_with("\nDDDDDDDD --Preamble MSB"));
    }

    #[test]
    fn render_of_nothing_is_empty() {
        assert_eq!(render(&[]), "");
    }
}

//! Unified event stream for the bench link
//!
//! Everything the link task observes (frames going out, serial data coming
//! back, stream closure) is emitted through a single broadcast channel, so a
//! monitor view and any other observer see the same ordered stream.

/// Events emitted by the link task
#[derive(Debug, Clone)]
pub enum LinkEvent {
    /// A frame was written to the transport (unpadded frame bytes)
    FrameSent {
        /// Raw frame bytes, before report padding
        data: Vec<u8>,
    },

    /// Bytes arrived from the device, rendered as fixed-width hex words
    SerialData {
        /// One 8-hex-char word per received byte
        text: String,
    },

    /// The transport stream closed
    Closed,
}

impl LinkEvent {
    /// Check if this is a traffic event (for monitor filtering)
    pub fn is_traffic(&self) -> bool {
        matches!(
            self,
            LinkEvent::FrameSent { .. } | LinkEvent::SerialData { .. }
        )
    }

    /// Get the rendered serial text if this event carries any
    pub fn serial_text(&self) -> Option<&str> {
        match self {
            LinkEvent::SerialData { text } => Some(text),
            _ => None,
        }
    }
}

//! Bench-side state tracking
//!
//! These value objects hold everything a diagnostic front-end would bind to:
//! the attenuation panel, the raw console entry fields, and the monitor
//! transcript. They replace ad-hoc shared mutable state with explicit values
//! a caller threads through its own event loop.

use iop_protocol::attenuation::{Attenuation, RegisterPair, Step};
use iop_protocol::device::LedColor;
use iop_protocol::display::{render, segment};
use iop_protocol::error::{AttenuationError, TokenError};
use iop_protocol::frame::{IopFrame, MAX_PAYLOAD_FIELDS};

/// Current state of the attenuation panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BenchState {
    /// Current attenuation level
    attenuation: Attenuation,
    /// Last LED color selected, if any
    led: Option<LedColor>,
}

impl BenchState {
    /// Create a panel at 0 dB with no LED selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Current attenuation level
    pub fn attenuation(&self) -> Attenuation {
        self.attenuation
    }

    /// Last LED color selected
    pub fn led(&self) -> Option<LedColor> {
        self.led
    }

    /// Apply a step adjustment
    ///
    /// On success the panel moves to the new level and the register pair to
    /// send is returned. A blocked adjustment leaves the panel unchanged.
    pub fn adjust(&mut self, step: Step) -> Result<RegisterPair, AttenuationError> {
        let next = self.attenuation.adjusted(step)?;
        self.attenuation = next;
        Ok(next.registers())
    }

    /// Jump directly to a level
    pub fn set_attenuation(&mut self, level: Attenuation) -> RegisterPair {
        self.attenuation = level;
        level.registers()
    }

    /// Record an LED selection
    pub fn set_led(&mut self, color: LedColor) {
        self.led = Some(color);
    }

    /// Format the panel headline for display
    pub fn status_line(&self) -> String {
        format!("Current Attenuation: {}", self.attenuation)
    }
}

/// Entry fields of the raw IOP console
///
/// Two message id fields and seven payload slots, edited freely as text and
/// validated only when a frame is composed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawConsole {
    /// Message id MSB text
    pub id_msb: String,
    /// Message id LSB text
    pub id_lsb: String,
    /// Payload field texts, in slot order
    pub slots: [String; MAX_PAYLOAD_FIELDS],
}

impl RawConsole {
    /// Create a console with every field empty
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no field has any text
    pub fn is_empty(&self) -> bool {
        self.id_msb.is_empty() && self.id_lsb.is_empty() && self.slots.iter().all(|s| s.is_empty())
    }

    /// Validate the current fields and build a frame
    ///
    /// Empty payload slots are skipped, blank ids default, and any non-hex
    /// text fails before a frame exists. The fields themselves are left
    /// untouched so the caller can correct and retry.
    pub fn compose(&self) -> Result<IopFrame, TokenError> {
        IopFrame::compose(&self.id_msb, &self.id_lsb, &self.slots)
    }

    /// Reset every field to empty
    pub fn clear(&mut self) {
        self.id_msb.clear();
        self.id_lsb.clear();
        for slot in &mut self.slots {
            slot.clear();
        }
    }
}

/// Scrolling transcript of link traffic
///
/// Incoming serial strings are appended as labeled fields; the transcript
/// only ever grows until explicitly cleared, so earlier exchanges stay
/// visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorLog {
    text: String,
}

impl MonitorLog {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an incoming serial string as labeled 8-character fields
    pub fn append_serial(&mut self, raw: &str) {
        let chunks = segment(raw);
        self.text.push_str(&render(&chunks));
    }

    /// Append a plain status line
    pub fn append_note(&mut self, note: &str) {
        self.text.push('\n');
        self.text.push_str(note);
    }

    /// The accumulated transcript
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns true if nothing has been appended yet
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Drop the whole transcript
    pub fn clear(&mut self) {
        self.text.clear();
    }
}

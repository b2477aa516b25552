//! Virtual DAC accessory
//!
//! Provides a simulated accessory that parses IOP frames out of the raw
//! byte stream, tracks register and LED state, and echoes traffic back the
//! way the real device does, so the bench monitor has something to show.

use std::collections::VecDeque;

use iop_protocol::attenuation::RegisterPair;
use iop_protocol::device::{DeviceCommand, LedColor};
use iop_protocol::wire::{IopCodec, WireMessage};
use serde::{Deserialize, Serialize};

/// A simulated DAC accessory
///
/// Feeds received bytes through the wire codec, applies canned commands to
/// its register/LED state, and queues echo output. Used by the device actor
/// task and directly in tests.
pub struct VirtualDac {
    /// Identifier for logging
    id: String,
    /// Streaming frame extraction
    codec: IopCodec,
    /// Last register pair written, if any
    registers: Option<RegisterPair>,
    /// Current LED color, if one was selected
    led: Option<LedColor>,
    /// Whether received frames are echoed back
    echo_enabled: bool,
    /// Frames received (for test verification)
    received_frames: Vec<WireMessage>,
    /// Pending echo output
    pending_output: VecDeque<Vec<u8>>,
}

/// Configuration for creating a virtual DAC
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualDacConfig {
    /// Display name/identifier
    pub id: String,
    /// Whether received frames are echoed back
    pub echo_enabled: bool,
    /// LED color at power-on, if any
    pub initial_led: Option<LedColor>,
}

impl Default for VirtualDacConfig {
    fn default() -> Self {
        Self {
            id: "Virtual DAC".to_string(),
            echo_enabled: true,
            initial_led: None,
        }
    }
}

impl VirtualDac {
    /// Create a new virtual DAC with echo enabled
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            codec: IopCodec::new(),
            registers: None,
            led: None,
            echo_enabled: true,
            received_frames: Vec::new(),
            pending_output: VecDeque::new(),
        }
    }

    /// Create a virtual DAC from configuration
    pub fn from_config(config: VirtualDacConfig) -> Self {
        Self {
            id: config.id,
            codec: IopCodec::new(),
            registers: None,
            led: config.initial_led,
            echo_enabled: config.echo_enabled,
            received_frames: Vec::new(),
            pending_output: VecDeque::new(),
        }
    }

    /// Get the identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Last register pair written, if any
    pub fn registers(&self) -> Option<RegisterPair> {
        self.registers
    }

    /// Current LED color, if one was selected
    pub fn led(&self) -> Option<LedColor> {
        self.led
    }

    /// Whether received frames are echoed back
    pub fn echo_enabled(&self) -> bool {
        self.echo_enabled
    }

    /// Enable or disable echoing
    pub fn set_echo(&mut self, enabled: bool) {
        self.echo_enabled = enabled;
    }

    /// Attenuation level implied by the current registers
    ///
    /// Returns `None` until a volume write arrives, or if the registers do
    /// not form a valid mapping.
    pub fn attenuation_db(&self) -> Option<u8> {
        let regs = self.registers?;
        let decade = regs.reg10.checked_sub(0xE0)?;
        let units = regs.reg1.checked_sub(0xD0)?;
        if decade > 7 || units > 9 {
            return None;
        }
        Some(decade * 10 + units)
    }

    /// Process bytes received from the bench
    ///
    /// Report padding and garbage between frames are skipped by the codec.
    /// Canned commands update register/LED state; every complete frame is
    /// recorded and, when echo is enabled, queued for output. Returns true
    /// if register or LED state changed.
    pub fn process_bytes(&mut self, data: &[u8]) -> bool {
        self.codec.push_bytes(data);

        let mut changed = false;
        while let Some((msg, raw)) = self.codec.next_message_with_bytes() {
            match DeviceCommand::decode(&msg) {
                Some(DeviceCommand::SetVolume(regs)) => {
                    if self.registers != Some(regs) {
                        self.registers = Some(regs);
                        changed = true;
                    }
                }
                Some(DeviceCommand::SetLed(color)) => {
                    if self.led != Some(color) {
                        self.led = Some(color);
                        changed = true;
                    }
                }
                None => {}
            }

            self.received_frames.push(msg);
            if self.echo_enabled {
                self.pending_output.push_back(raw);
            }
        }

        changed
    }

    /// Take the next pending echo output, if any
    pub fn take_output(&mut self) -> Option<Vec<u8>> {
        self.pending_output.pop_front()
    }

    /// Get all received frames (for test verification)
    pub fn received_frames(&self) -> &[WireMessage] {
        &self.received_frames
    }

    /// Clear received frames
    pub fn clear_received(&mut self) {
        self.received_frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iop_protocol::frame::IopFrame;

    #[test]
    fn test_volume_write_updates_registers() {
        let mut dac = VirtualDac::new("test");
        assert_eq!(dac.registers(), None);
        assert_eq!(dac.attenuation_db(), None);

        let regs = RegisterPair::for_db(37).unwrap();
        let changed = dac.process_bytes(&DeviceCommand::SetVolume(regs).encode());

        assert!(changed);
        assert_eq!(dac.registers(), Some(regs));
        assert_eq!(dac.attenuation_db(), Some(37));
    }

    #[test]
    fn test_led_select_updates_state() {
        let mut dac = VirtualDac::new("test");
        assert_eq!(dac.led(), None);

        assert!(dac.process_bytes(&DeviceCommand::SetLed(LedColor::Green).encode()));
        assert_eq!(dac.led(), Some(LedColor::Green));

        // Re-selecting the same color is not a change
        assert!(!dac.process_bytes(&DeviceCommand::SetLed(LedColor::Green).encode()));
        assert!(dac.process_bytes(&DeviceCommand::SetLed(LedColor::Red).encode()));
        assert_eq!(dac.led(), Some(LedColor::Red));
    }

    #[test]
    fn test_console_frames_are_recorded_and_echoed() {
        let mut dac = VirtualDac::new("test");

        let wire = IopFrame::compose("1A", "0", &["0A", "14"]).unwrap().wire_bytes();
        let changed = dac.process_bytes(&wire);

        assert!(!changed);
        assert_eq!(dac.received_frames().len(), 1);
        assert_eq!(dac.received_frames()[0].message_id, [0x1A, 0x00]);
        assert_eq!(dac.take_output(), Some(wire));
        assert_eq!(dac.take_output(), None);

        dac.clear_received();
        assert!(dac.received_frames().is_empty());
    }

    #[test]
    fn test_echo_disabled_queues_nothing() {
        let mut dac = VirtualDac::from_config(VirtualDacConfig {
            echo_enabled: false,
            ..VirtualDacConfig::default()
        });

        let wire = IopFrame::compose("", "", &["05"]).unwrap().wire_bytes();
        dac.process_bytes(&wire);

        assert_eq!(dac.received_frames().len(), 1);
        assert_eq!(dac.take_output(), None);
    }

    #[test]
    fn test_report_padding_between_frames_is_skipped() {
        let mut dac = VirtualDac::new("test");

        let regs = RegisterPair::for_db(8).unwrap();
        let mut report = [0u8; 64];
        let frame = DeviceCommand::SetVolume(regs).encode();
        report[..frame.len()].copy_from_slice(&frame);

        dac.process_bytes(&report);
        dac.process_bytes(&[0u8; 64]);

        assert_eq!(dac.registers(), Some(regs));
        assert_eq!(dac.received_frames().len(), 1);
    }

    #[test]
    fn test_frames_split_across_reads_reassemble() {
        let mut dac = VirtualDac::new("test");

        let frame = DeviceCommand::SetLed(LedColor::Blue).encode();
        let (head, tail) = frame.split_at(6);

        assert!(!dac.process_bytes(head));
        assert!(dac.process_bytes(tail));
        assert_eq!(dac.led(), Some(LedColor::Blue));
    }

    #[test]
    fn test_invalid_registers_yield_no_attenuation() {
        let mut dac = VirtualDac::new("test");

        // A volume frame whose registers are outside the mapped range
        let mut frame = DeviceCommand::SetVolume(RegisterPair {
            reg10: 0xE0,
            reg1: 0xD0,
        })
        .encode();
        frame[13] = 0x10;
        frame[14] = 0x10;

        dac.process_bytes(&frame);
        assert!(dac.registers().is_some());
        assert_eq!(dac.attenuation_db(), None);
    }
}

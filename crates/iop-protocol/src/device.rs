//! Canned device command frames
//!
//! Besides the raw console, the bench sends a small fixed vocabulary of
//! commands to the accessory: a volume register write and a status LED
//! select. Both ride the I2C-transfer message id and carry their length and
//! register arguments baked into the frame, so they bypass the token
//! encoder entirely.

use crate::attenuation::RegisterPair;
use crate::wire::WireMessage;

/// Message id used by every I2C register transfer
pub const I2C_TRANSFER_ID: [u8; 2] = [0xD4, 0x00];

/// Status LED colors the accessory supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LedColor {
    /// Fault indication
    Red,
    /// Ready indication
    Green,
    /// Activity indication
    Blue,
}

impl LedColor {
    /// Wire code for this color
    pub fn code(&self) -> u8 {
        match self {
            Self::Red => 1,
            Self::Green => 2,
            Self::Blue => 3,
        }
    }

    /// Look up a color by its wire code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Red),
            2 => Some(Self::Green),
            3 => Some(Self::Blue),
            _ => None,
        }
    }
}

impl std::fmt::Display for LedColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        };
        write!(f, "{}", name)
    }
}

/// A fixed command frame the bench can send without the raw console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceCommand {
    /// Write the attenuation register pair
    SetVolume(RegisterPair),
    /// Select the status LED color
    SetLed(LedColor),
}

impl DeviceCommand {
    /// Serialize this command to its wire frame
    ///
    /// The frames are fixed 15-byte (volume) and 13-byte (LED) sequences
    /// with only the register or color bytes varying. Report padding is the
    /// link layer's job.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::SetVolume(regs) => vec![
                0x2A, 0x2A, 0x00, 0x0F, 0xD4, 0x00, 0x01, 0x88, 0x00, 0x05, 0x88, 0xF0, 0x74,
                regs.reg10, regs.reg1,
            ],
            Self::SetLed(color) => vec![
                0x2A, 0x2A, 0x00, 0x0D, 0xD4, 0x00, 0x01, 0x10, 0x00, 0x03, 0x01,
                color.code(),
                0x17,
            ],
        }
    }

    /// Recognize a canned command in a decoded wire frame
    ///
    /// Returns `None` for frames outside the fixed vocabulary; the caller
    /// decides whether that is noise or a console frame.
    pub fn decode(msg: &WireMessage) -> Option<Self> {
        if msg.message_id != I2C_TRANSFER_ID {
            return None;
        }

        match msg.payload.as_slice() {
            [0x01, 0x88, 0x00, 0x05, 0x88, 0xF0, 0x74, reg10, reg1] => {
                Some(Self::SetVolume(RegisterPair {
                    reg10: *reg10,
                    reg1: *reg1,
                }))
            }
            [0x01, 0x10, 0x00, 0x03, 0x01, code, 0x17] => {
                LedColor::from_code(*code).map(Self::SetLed)
            }
            _ => None,
        }
    }

    /// Returns true if this command changes the attenuation registers
    pub fn is_volume(&self) -> bool {
        matches!(self, Self::SetVolume(_))
    }
}

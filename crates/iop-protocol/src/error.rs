//! Error types for IOP encoding and decoding

use thiserror::Error;

/// Errors raised while building a console frame from operator input
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Field text is not parseable as base-16
    #[error("invalid hex token: {0:?}")]
    InvalidHex(String),

    /// More payload fields than the console form carries
    #[error("too many payload fields: {count} (limit {limit})")]
    TooManyFields { count: usize, limit: usize },
}

/// Errors raised while extracting frames from a raw byte stream
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Buffer is incomplete - need more data
    #[error("incomplete frame: need {needed} more bytes")]
    Incomplete { needed: usize },

    /// Invalid frame structure
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    /// Declared length is impossible for this protocol
    #[error("invalid frame length: {0}")]
    InvalidLength(u8),
}

/// Errors raised by attenuation range and adjustment checks
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AttenuationError {
    /// Attenuation outside the supported range
    #[error("attenuation {0} dB is outside the supported 0-79 dB range")]
    OutOfRange(i32),

    /// Adjustment would leave the supported range
    #[error("cannot proceed: {step:+} dB from {current} dB leaves the 0-79 dB range")]
    StepBlocked { current: u8, step: i8 },
}

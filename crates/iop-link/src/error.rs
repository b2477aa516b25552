//! Error types for the bench link

use thiserror::Error;

/// Errors that can occur in the link engine
#[derive(Debug, Error)]
pub enum LinkError {
    /// Console input could not be tokenized
    #[error("token error: {0}")]
    Token(#[from] iop_protocol::TokenError),

    /// Attenuation change rejected
    #[error("attenuation error: {0}")]
    Attenuation(#[from] iop_protocol::AttenuationError),

    /// I/O error on the transport stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The link task has exited and no longer accepts commands
    #[error("link task is no longer running")]
    LinkClosed,
}

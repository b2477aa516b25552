//! Bench Link Engine
//!
//! This crate wires the IOP protocol core to an async transport. It holds
//! the state a diagnostic front-end binds to (attenuation panel, raw
//! console, monitor transcript) and runs the I/O task that moves frames
//! over the serial bridge.
//!
//! # Channel-Based Architecture
//!
//! The link task owns the transport stream exclusively. Consumers hold
//! channel endpoints only:
//!
//! - Commands go in through an mpsc channel ([`LinkCommand`])
//! - Everything observed on the link comes back on a broadcast channel
//!   ([`LinkEvent`]), so a monitor view and tests see the same stream
//!
//! The task is generic over `AsyncRead + AsyncWrite`, so a real bridge
//! port and an in-memory duplex stream run identical code.
//!
//! # Example
//!
//! ```rust,no_run
//! use iop_link::{send_step, BenchState, LinkConfig, LinkError, run_link_task};
//! use iop_protocol::attenuation::Step;
//! use tokio::sync::{broadcast, mpsc};
//!
//! # async fn demo(stream: tokio::io::DuplexStream) -> Result<(), LinkError> {
//! let (cmd_tx, cmd_rx) = mpsc::channel(32);
//! let (event_tx, _event_rx) = broadcast::channel(32);
//! tokio::spawn(run_link_task(stream, LinkConfig::default(), cmd_rx, event_tx));
//!
//! // Step the panel and send the matching register write to the device
//! let mut panel = BenchState::new();
//! let regs = send_step(&mut panel, Step::Up5, &cmd_tx).await?;
//! assert_eq!((regs.reg10, regs.reg1), (0xE0, 0xD5));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod events;
pub mod state;
pub mod task;

pub use error::LinkError;
pub use events::LinkEvent;
pub use state::{BenchState, MonitorLog, RawConsole};
pub use task::{run_link_task, send_console, send_step, LinkCommand, LinkConfig, BAUD_RATE};

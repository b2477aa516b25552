//! Async link task
//!
//! One task owns the transport stream exclusively and runs a select loop:
//! commands arrive on an mpsc channel and are written as padded bulk
//! reports, received bytes are rendered as hex words and published on a
//! broadcast channel. Generic over the stream type so real bridges and
//! in-memory duplex streams get the same implementation.

use std::io;

use iop_protocol::attenuation::{RegisterPair, Step};
use iop_protocol::device::DeviceCommand;
use iop_protocol::frame::{IopFrame, REPORT_LEN};
use iop_protocol::hex::dump_bytes;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::error::LinkError;
use crate::events::LinkEvent;
use crate::state::{BenchState, RawConsole};

/// UART rate of the CP2615-style bridge
pub const BAUD_RATE: u32 = 9600;

/// Serial link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Port name a front-end would show, empty when undecided
    pub port: String,
    /// Baud rate for the bridge UART
    pub baud_rate: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: BAUD_RATE,
        }
    }
}

/// Commands that can be sent to the link task
#[derive(Debug, Clone)]
pub enum LinkCommand {
    /// Serialize and send a console frame
    Transmit(IopFrame),
    /// Send a canned device command
    Device(DeviceCommand),
    /// Shutdown the link task
    Shutdown,
}

/// Run the link I/O task
///
/// The task owns the stream and processes:
/// 1. Commands from the mpsc channel, written as 64-byte reports followed by
///    the all-zero flush report
/// 2. Received bytes, rendered one 8-hex-char word per byte and broadcast as
///    [`LinkEvent::SerialData`]
///
/// Returns when shutdown is requested, the command channel closes, or the
/// stream closes; stream errors are returned to the caller.
pub async fn run_link_task<S>(
    mut stream: S,
    config: LinkConfig,
    mut cmd_rx: mpsc::Receiver<LinkCommand>,
    event_tx: broadcast::Sender<LinkEvent>,
) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    info!(
        "Starting link task ({} baud on {:?})",
        config.baud_rate, config.port
    );

    let mut buf = [0u8; 256];

    loop {
        tokio::select! {
            // Read from the device
            result = stream.read(&mut buf) => {
                match result {
                    Ok(0) => {
                        debug!("Link stream closed");
                        let _ = event_tx.send(LinkEvent::Closed);
                        break;
                    }
                    Ok(n) => {
                        let data = &buf[..n];
                        debug!("Link received {} bytes: {:02X?}", n, data);
                        let _ = event_tx.send(LinkEvent::SerialData {
                            text: dump_bytes(data),
                        });
                    }
                    Err(e) => {
                        warn!("Link stream error: {}", e);
                        return Err(e);
                    }
                }
            }

            // Handle commands from the channel
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(LinkCommand::Transmit(frame)) => {
                        let bytes = frame.wire_bytes();
                        debug!("Transmitting console frame: {:02X?}", bytes);
                        write_report(&mut stream, &bytes).await?;
                        let _ = event_tx.send(LinkEvent::FrameSent { data: bytes });
                    }
                    Some(LinkCommand::Device(dev_cmd)) => {
                        let bytes = dev_cmd.encode();
                        debug!("Sending device command: {:02X?}", bytes);
                        write_report(&mut stream, &bytes).await?;
                        let _ = event_tx.send(LinkEvent::FrameSent { data: bytes });
                    }
                    Some(LinkCommand::Shutdown) => {
                        info!("Shutdown requested for link task");
                        break;
                    }
                    None => {
                        debug!("Command channel closed for link task");
                        break;
                    }
                }
            }
        }
    }

    info!("Link task ended");
    Ok(())
}

/// Compose the console's fields and hand the frame to the link task
///
/// The composed frame is returned so the caller can show its token
/// sequence. Invalid fields fail before anything is queued; a dead link
/// task fails with [`LinkError::LinkClosed`].
pub async fn send_console(
    console: &RawConsole,
    cmd_tx: &mpsc::Sender<LinkCommand>,
) -> Result<IopFrame, LinkError> {
    let frame = console.compose()?;
    cmd_tx
        .send(LinkCommand::Transmit(frame.clone()))
        .await
        .map_err(|_| LinkError::LinkClosed)?;
    Ok(frame)
}

/// Step the attenuation panel and send the matching register write
///
/// The panel moves only once the command is queued; a blocked step or a
/// dead link task leaves it unchanged.
pub async fn send_step(
    panel: &mut BenchState,
    step: Step,
    cmd_tx: &mpsc::Sender<LinkCommand>,
) -> Result<RegisterPair, LinkError> {
    let next = panel.attenuation().adjusted(step)?;
    let regs = next.registers();
    cmd_tx
        .send(LinkCommand::Device(DeviceCommand::SetVolume(regs)))
        .await
        .map_err(|_| LinkError::LinkClosed)?;
    panel.set_attenuation(next);
    Ok(regs)
}

/// Write a frame padded to the bulk report size, then the all-zero flush
/// report the bridge needs before it commits the transfer.
///
/// Frames are at most 15 bytes by construction, always within one report.
async fn write_report<S>(stream: &mut S, frame: &[u8]) -> io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    let mut report = [0u8; REPORT_LEN];
    report[..frame.len()].copy_from_slice(frame);
    stream.write_all(&report).await?;
    stream.write_all(&[0u8; REPORT_LEN]).await?;
    stream.flush().await
}

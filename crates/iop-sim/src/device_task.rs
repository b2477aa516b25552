//! Virtual DAC actor task
//!
//! This module provides a pure async task that owns a VirtualDac and
//! communicates via an async stream. The task uses a select! loop to:
//! - Read bench traffic from the connection stream and process it
//! - Write queued echo output back to the stream
//! - Handle shutdown commands from a channel
//! - Emit state change events via a broadcast channel

use std::io;

use iop_protocol::attenuation::RegisterPair;
use iop_protocol::device::LedColor;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::VirtualDac;

/// Commands that can be sent to a virtual DAC actor
#[derive(Debug, Clone)]
pub enum VirtualDacCommand {
    /// Enable or disable echoing received frames
    SetEcho(bool),
    /// Shutdown the virtual DAC actor
    Shutdown,
}

/// State event emitted when virtual DAC state changes
#[derive(Debug, Clone)]
pub struct VirtualDacStateEvent {
    /// Last register pair written, if any
    pub registers: Option<RegisterPair>,
    /// Current LED color, if one was selected
    pub led: Option<LedColor>,
}

/// Run the virtual DAC actor task
///
/// This task owns the VirtualDac and processes:
/// 1. Bench traffic read from the stream (frames plus report padding)
/// 2. Echo/shutdown commands from the command channel
///
/// State changes are emitted via the broadcast channel for observation.
pub async fn run_virtual_dac_task<S>(
    mut stream: S,
    mut dac: VirtualDac,
    mut cmd_rx: mpsc::Receiver<VirtualDacCommand>,
    state_tx: broadcast::Sender<VirtualDacStateEvent>,
) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buf = [0u8; 1024];

    info!("Starting virtual DAC task for {}", dac.id());

    // Emit initial state
    let _ = state_tx.send(VirtualDacStateEvent {
        registers: dac.registers(),
        led: dac.led(),
    });

    loop {
        tokio::select! {
            // Read bench traffic from the connection stream
            result = stream.read(&mut buf) => {
                match result {
                    Ok(0) => {
                        debug!("Virtual DAC stream closed for {}", dac.id());
                        break;
                    }
                    Ok(n) => {
                        let data = &buf[..n];
                        debug!(
                            "Virtual DAC {} received {} bytes: {:02X?}",
                            dac.id(), n, data
                        );

                        if dac.process_bytes(data) {
                            let event = VirtualDacStateEvent {
                                registers: dac.registers(),
                                led: dac.led(),
                            };
                            debug!(
                                "Virtual DAC {} state changed: regs={:?}, led={:?}",
                                dac.id(), event.registers, event.led
                            );
                            let _ = state_tx.send(event);
                        }

                        // Write any echo output queued by processing
                        while let Some(bytes) = dac.take_output() {
                            debug!(
                                "Virtual DAC {} echoing {} bytes",
                                dac.id(), bytes.len()
                            );
                            if let Err(e) = stream.write_all(&bytes).await {
                                warn!("Failed to write echo output: {}", e);
                                return Err(e);
                            }
                            let _ = stream.flush().await;
                        }
                    }
                    Err(e) => {
                        warn!("Virtual DAC {} stream error: {}", dac.id(), e);
                        return Err(e);
                    }
                }
            }

            // Handle commands from the channel
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(VirtualDacCommand::SetEcho(enabled)) => {
                        info!("Virtual DAC {} echo set to {}", dac.id(), enabled);
                        dac.set_echo(enabled);
                    }
                    Some(VirtualDacCommand::Shutdown) => {
                        info!("Shutdown requested for virtual DAC {}", dac.id());
                        break;
                    }
                    None => {
                        debug!("Command channel closed for virtual DAC {}", dac.id());
                        break;
                    }
                }
            }
        }
    }

    info!("Virtual DAC task ended for {}", dac.id());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use iop_protocol::device::DeviceCommand;
    use iop_protocol::frame::IopFrame;
    use std::time::Duration;

    #[tokio::test]
    async fn test_virtual_dac_processes_volume_command() {
        let (mut connection_stream, dac_stream) = tokio::io::duplex(1024);

        let dac = VirtualDac::new("Test");
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (state_tx, mut state_rx) = broadcast::channel(32);

        let task_handle = tokio::spawn(run_virtual_dac_task(dac_stream, dac, cmd_rx, state_tx));

        // Drain the initial state event
        let initial = state_rx.recv().await.unwrap();
        assert_eq!(initial.registers, None);

        let regs = RegisterPair::for_db(42).unwrap();
        connection_stream
            .write_all(&DeviceCommand::SetVolume(regs).encode())
            .await
            .unwrap();

        let event = tokio::time::timeout(Duration::from_millis(100), state_rx.recv())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(event.registers, Some(regs));

        drop(cmd_tx);
        drop(connection_stream);
        let _ = task_handle.await;
    }

    #[tokio::test]
    async fn test_virtual_dac_emits_led_changes() {
        let (mut connection_stream, dac_stream) = tokio::io::duplex(1024);

        let dac = VirtualDac::new("Test");
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (state_tx, mut state_rx) = broadcast::channel(32);

        let task_handle = tokio::spawn(run_virtual_dac_task(dac_stream, dac, cmd_rx, state_tx));

        // Drain initial state
        let _ = state_rx.recv().await.unwrap();

        connection_stream
            .write_all(&DeviceCommand::SetLed(LedColor::Green).encode())
            .await
            .unwrap();

        let event = tokio::time::timeout(Duration::from_millis(100), state_rx.recv())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(event.led, Some(LedColor::Green));

        drop(cmd_tx);
        drop(connection_stream);
        let _ = task_handle.await;
    }

    #[tokio::test]
    async fn test_virtual_dac_echoes_console_frames() {
        let (mut connection_stream, dac_stream) = tokio::io::duplex(1024);

        let dac = VirtualDac::new("Test");
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (state_tx, _state_rx) = broadcast::channel(32);

        let task_handle = tokio::spawn(run_virtual_dac_task(dac_stream, dac, cmd_rx, state_tx));

        let wire = IopFrame::compose("1A", "0", &["0A", "14"]).unwrap().wire_bytes();
        connection_stream.write_all(&wire).await.unwrap();

        let mut echoed = vec![0u8; wire.len()];
        tokio::time::timeout(
            Duration::from_millis(100),
            connection_stream.read_exact(&mut echoed),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(echoed, wire);

        drop(cmd_tx);
        drop(connection_stream);
        let _ = task_handle.await;
    }

    #[tokio::test]
    async fn test_virtual_dac_shutdown_command() {
        let (_connection_stream, dac_stream) = tokio::io::duplex(1024);

        let dac = VirtualDac::new("Test");
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (state_tx, _state_rx) = broadcast::channel(32);

        let task_handle = tokio::spawn(run_virtual_dac_task(dac_stream, dac, cmd_rx, state_tx));

        cmd_tx.send(VirtualDacCommand::Shutdown).await.unwrap();

        let result = tokio::time::timeout(Duration::from_millis(100), task_handle)
            .await
            .unwrap();
        assert!(result.is_ok());
    }
}

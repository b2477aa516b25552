//! DAC Accessory Simulation Library
//!
//! This crate provides a simulated DAC accessory for exercising the bench
//! without physical hardware. It includes:
//!
//! - **VirtualDac**: Parses IOP frames from raw bytes, tracks register and
//!   LED state, and echoes traffic for loopback display
//! - **run_virtual_dac_task**: An async actor wrapping a VirtualDac around
//!   any `AsyncRead + AsyncWrite` stream
//!
//! # Example
//!
//! ```rust
//! use iop_protocol::attenuation::RegisterPair;
//! use iop_protocol::device::DeviceCommand;
//! use iop_sim::VirtualDac;
//!
//! let mut dac = VirtualDac::new("Bench DAC");
//!
//! // Feed it a volume write, padding and all
//! let regs = RegisterPair::for_db(25).unwrap();
//! let mut report = [0u8; 64];
//! let frame = DeviceCommand::SetVolume(regs).encode();
//! report[..frame.len()].copy_from_slice(&frame);
//! dac.process_bytes(&report);
//!
//! assert_eq!(dac.registers(), Some(regs));
//! assert_eq!(dac.attenuation_db(), Some(25));
//! ```

pub mod device;
pub mod device_task;

pub use device::{VirtualDac, VirtualDacConfig};
pub use device_task::{run_virtual_dac_task, VirtualDacCommand, VirtualDacStateEvent};

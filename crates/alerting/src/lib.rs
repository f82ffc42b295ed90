//! Alerting System
//!
//! Turns drowsiness state edges into idempotent start/stop commands for an
//! audio alert device.

mod device;
mod manager;
pub mod mock;

pub use device::{AudioAlertDevice, AudioError, TracingAudio};
pub use manager::{AlertCommand, AlertCoordinator, AlertStats};

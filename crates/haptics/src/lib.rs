//! Haptic Actuator Control
//!
//! Drives a haptic device (e.g. a steering-wheel rumble effect) from the
//! latest drowsiness signal on its own fixed-rate thread.
//!
//! ## Safety
//!
//! The device is owned by a [`NeutralGuard`] for its whole life on the
//! actuator thread. Whatever way the loop ends (stop request, device error,
//! failed initialization, panic unwinding) the guard issues a zero-intensity
//! command and shuts the device down before the thread exits.
//!
//! ## Threading
//!
//! All driver calls happen on the actuator thread. The only state shared
//! with the perception side is [`SharedSignal`]: two atomic flags.

pub mod actuator;
pub mod driver;
pub mod guard;
pub mod mock;
pub mod signal;

pub use actuator::{ActuatorConfig, ActuatorHandle, ActuatorLoop, ActuatorReport};
pub use driver::TracingHaptics;
pub use guard::NeutralGuard;
pub use signal::SharedSignal;

use serde::Serialize;
use thiserror::Error;

/// Haptic error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HapticError {
    #[error("Actuator initialization failed: {0}")]
    Init(String),

    #[error("Actuator device error: {0}")]
    Device(String),

    #[error("Intensity {0} is outside 0..=100")]
    IntensityOutOfRange(u8),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to spawn actuator thread: {0}")]
    Spawn(String),

    #[error("Actuator thread panicked")]
    Panicked,
}

/// Effect strength in percent, 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash, Serialize)]
#[serde(transparent)]
pub struct Intensity(u8);

impl Intensity {
    /// The neutral (off) command
    pub const NEUTRAL: Intensity = Intensity(0);
    pub const MAX: Intensity = Intensity(100);

    pub fn new(percent: u8) -> Result<Self, HapticError> {
        if percent > Self::MAX.0 {
            return Err(HapticError::IntensityOutOfRange(percent));
        }
        Ok(Self(percent))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_neutral(self) -> bool {
        self == Self::NEUTRAL
    }
}

/// Low-level haptic device interface.
///
/// Implementations are moved onto the actuator thread and never touched
/// from anywhere else.
pub trait HapticDriver: Send {
    fn initialize(&mut self) -> Result<(), HapticError>;

    /// Set the effect on a channel; takes effect on the next `flush`
    fn set_effect(&mut self, channel: u8, intensity: Intensity) -> Result<(), HapticError>;

    fn flush(&mut self) -> Result<(), HapticError>;

    fn shutdown(&mut self) -> Result<(), HapticError>;
}

impl<D: HapticDriver + ?Sized> HapticDriver for Box<D> {
    fn initialize(&mut self) -> Result<(), HapticError> {
        (**self).initialize()
    }

    fn set_effect(&mut self, channel: u8, intensity: Intensity) -> Result<(), HapticError> {
        (**self).set_effect(channel, intensity)
    }

    fn flush(&mut self) -> Result<(), HapticError> {
        (**self).flush()
    }

    fn shutdown(&mut self) -> Result<(), HapticError> {
        (**self).shutdown()
    }
}

//! Headless haptic driver

use crate::{HapticDriver, HapticError, Intensity};
use tracing::{debug, info, warn};

/// Driver that logs intensity changes instead of moving hardware.
///
/// Used when no device is attached, so the rest of the pipeline runs
/// unchanged.
#[derive(Debug, Default)]
pub struct TracingHaptics {
    initialized: bool,
    pending: Option<(u8, Intensity)>,
    applied: Option<Intensity>,
}

impl TracingHaptics {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HapticDriver for TracingHaptics {
    fn initialize(&mut self) -> Result<(), HapticError> {
        info!("Tracing haptics initialized (no hardware)");
        self.initialized = true;
        Ok(())
    }

    fn set_effect(&mut self, channel: u8, intensity: Intensity) -> Result<(), HapticError> {
        if !self.initialized {
            return Err(HapticError::Device("not initialized".into()));
        }
        self.pending = Some((channel, intensity));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), HapticError> {
        if let Some((channel, intensity)) = self.pending.take() {
            if self.applied != Some(intensity) {
                if intensity.is_neutral() {
                    info!("Haptic channel {} idle", channel);
                } else {
                    warn!("Haptic channel {} vibrating at {}%", channel, intensity.value());
                }
            } else {
                debug!("Haptic channel {} holding {}%", channel, intensity.value());
            }
            self.applied = Some(intensity);
        }
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), HapticError> {
        self.initialized = false;
        info!("Tracing haptics shut down");
        Ok(())
    }
}

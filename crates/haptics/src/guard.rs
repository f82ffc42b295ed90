//! Scoped ownership of the haptic device

use crate::{HapticDriver, HapticError, Intensity};
use tracing::{debug, info, warn};

/// Owns the driver and returns it to neutral when dropped.
///
/// Drop order: neutral effect, flush, shutdown. Errors during drop are
/// logged; every step is still attempted.
pub struct NeutralGuard<D: HapticDriver> {
    driver: D,
    channel: u8,
    last: Option<Intensity>,
}

impl<D: HapticDriver> NeutralGuard<D> {
    /// Take ownership of the driver and initialize it.
    ///
    /// The guard exists before `initialize` runs, so a failed initialization
    /// still gets the neutral command and shutdown.
    pub fn initialize(driver: D, channel: u8) -> Result<Self, HapticError> {
        let mut guard = Self {
            driver,
            channel,
            last: None,
        };
        guard.driver.initialize()?;
        info!("Haptic device initialized (channel {})", channel);
        Ok(guard)
    }

    /// Set the effect and flush it to the device
    pub fn command(&mut self, intensity: Intensity) -> Result<(), HapticError> {
        self.driver.set_effect(self.channel, intensity)?;
        self.driver.flush()?;
        if self.last != Some(intensity) {
            debug!("Haptic intensity -> {}", intensity.value());
        }
        self.last = Some(intensity);
        Ok(())
    }
}

impl<D: HapticDriver> Drop for NeutralGuard<D> {
    fn drop(&mut self) {
        if let Err(e) = self.driver.set_effect(self.channel, Intensity::NEUTRAL) {
            warn!("Failed to send neutral haptic command: {}", e);
        }
        if let Err(e) = self.driver.flush() {
            warn!("Failed to flush neutral haptic command: {}", e);
        }
        if let Err(e) = self.driver.shutdown() {
            warn!("Haptic device shutdown failed: {}", e);
        }
        info!("Haptic device returned to neutral and released");
    }
}

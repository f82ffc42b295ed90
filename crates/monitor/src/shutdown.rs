//! Stop-signal broadcast and actuator join

use crate::StopReason;
use haptics::{ActuatorHandle, ActuatorReport, HapticError, SharedSignal};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Result of [`ShutdownCoordinator::shutdown`]
#[derive(Debug)]
pub struct ShutdownOutcome {
    /// First stop reason recorded, if any
    pub reason: Option<StopReason>,
    /// How the actuator thread ended
    pub actuator: Result<ActuatorReport, HapticError>,
}

/// Owns the stop flag and the actuator thread.
///
/// The first stop request wins; later ones are ignored. If the coordinator
/// is dropped without [`shutdown`](Self::shutdown), it still raises the
/// stop flag and joins the actuator thread.
pub struct ShutdownCoordinator {
    signal: Arc<SharedSignal>,
    actuator: Option<ActuatorHandle>,
    reason: Option<StopReason>,
}

impl ShutdownCoordinator {
    pub fn new(signal: Arc<SharedSignal>, actuator: ActuatorHandle) -> Self {
        Self {
            signal,
            actuator: Some(actuator),
            reason: None,
        }
    }

    /// Signal shared with the actuator thread
    pub fn signal(&self) -> &SharedSignal {
        &self.signal
    }

    /// Record `reason` and raise the stop flag. Returns `false` if a stop
    /// was already requested.
    pub fn request_stop(&mut self, reason: StopReason) -> bool {
        if let Some(first) = self.reason {
            debug!("Stop already requested ({}), ignoring {}", first, reason);
            return false;
        }
        self.reason = Some(reason);
        self.signal.request_stop();
        info!("Stop requested: {}", reason);
        true
    }

    pub fn reason(&self) -> Option<StopReason> {
        self.reason
    }

    pub fn stop_requested(&self) -> bool {
        self.signal.stop_requested()
    }

    /// The actuator thread ended although nobody asked it to
    pub fn actuator_exited_early(&self) -> bool {
        !self.signal.stop_requested()
            && self.actuator.as_ref().is_some_and(ActuatorHandle::is_finished)
    }

    /// Raise the stop flag (if not yet raised) and wait for the actuator
    /// thread. On return the device has been neutralized and released.
    pub fn shutdown(mut self) -> ShutdownOutcome {
        self.signal.request_stop();
        let actuator = self.join();
        ShutdownOutcome {
            reason: self.reason,
            actuator,
        }
    }

    fn join(&mut self) -> Result<ActuatorReport, HapticError> {
        let Some(handle) = self.actuator.take() else {
            return Err(HapticError::Panicked);
        };

        let result = handle.join();
        match &result {
            Ok(report) => info!("Actuator stopped after {} ticks", report.ticks),
            Err(e) => warn!("Actuator ended with error: {}", e),
        }
        result
    }
}

impl Drop for ShutdownCoordinator {
    fn drop(&mut self) {
        if self.actuator.is_some() {
            self.signal.request_stop();
            if let Err(e) = self.join() {
                error!("Actuator join during drop: {}", e);
            }
        }
    }
}

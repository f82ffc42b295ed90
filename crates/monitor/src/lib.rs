//! Drowsiness Monitor
//!
//! Wires the pipeline together:
//! - Perception loop: frame -> landmarks -> EAR -> state -> audio alert
//! - Actuator loop on its own thread, fed through [`haptics::SharedSignal`]
//! - Ordered shutdown: stop signal, actuator join, audio release, video release

pub mod context;
pub mod controls;
pub mod logging;
pub mod perception;
pub mod settings;
pub mod shutdown;
pub mod summary;

pub use context::AppContext;
pub use controls::{NoControls, OperatorControls, QuitFlag};
pub use logging::init_logging;
pub use perception::{FrameStats, Perception};
pub use settings::{LoggingConfig, MonitorConfig, Settings};
pub use shutdown::{ShutdownCoordinator, ShutdownOutcome};
pub use summary::SessionSummary;

use alerting::{AlertCoordinator, AudioAlertDevice};
use camera_capture::{CameraError, FrameSource};
use chrono::Utc;
use dms::{DmsError, DmsModule, LandmarkSource};
use haptics::{ActuatorLoop, HapticDriver, HapticError, SharedSignal};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Monitor error types
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error(transparent)]
    Dms(#[from] DmsError),

    #[error(transparent)]
    Haptic(#[from] HapticError),
}

impl From<config::ConfigError> for MonitorError {
    fn from(e: config::ConfigError) -> Self {
        MonitorError::Config(e.to_string())
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Quit key or Ctrl-C
    OperatorQuit,
    /// Display window closed
    WindowClosed,
    /// Frame or landmark source ran out
    EndOfStream,
    /// Frame source returned an error
    FrameSourceFailed,
    /// Actuator loop exited while it was still required
    ActuatorFailed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::OperatorQuit => "operator quit",
            StopReason::WindowClosed => "window closed",
            StopReason::EndOfStream => "end of stream",
            StopReason::FrameSourceFailed => "frame source failed",
            StopReason::ActuatorFailed => "actuator failed",
        };
        f.write_str(s)
    }
}

/// The four devices a session runs on
pub struct Devices<C, L, A, D> {
    pub camera: C,
    pub landmarks: L,
    pub audio: A,
    pub haptics: D,
}

/// Run one monitoring session to completion on the calling thread.
///
/// Blocks until a stop condition is met, then shuts down in order and
/// returns the session summary. Only setup errors are returned as `Err`;
/// failures after startup end up in the summary.
pub fn run<C, L, A, D>(
    settings: &Settings,
    devices: Devices<C, L, A, D>,
    controls: &dyn OperatorControls,
) -> Result<SessionSummary, MonitorError>
where
    C: FrameSource,
    L: LandmarkSource,
    A: AudioAlertDevice,
    D: HapticDriver + 'static,
{
    settings.validate()?;

    let session_id = Uuid::new_v4();
    let started_at = Utc::now();
    let span = tracing::info_span!("session", id = %session_id);
    let _enter = span.enter();
    info!("Session started");

    let dms = DmsModule::new(&settings.dms, devices.landmarks)?;
    // Declared before the coordinator so that, on unwind, the actuator is
    // joined before audio and video are dropped.
    let mut ctx = AppContext::new(devices.camera, dms, AlertCoordinator::new(devices.audio));

    let signal = Arc::new(SharedSignal::new());
    let actuator = ActuatorLoop::spawn(
        devices.haptics,
        Arc::clone(&signal),
        settings.actuator.clone(),
    )?;
    let mut coordinator = ShutdownCoordinator::new(signal, actuator);

    let mut perception = Perception::new(settings.monitor.require_actuator);
    let reason = perception.run(&mut ctx, &mut coordinator, controls);

    let outcome = coordinator.shutdown();
    let alerts = ctx.teardown();

    let summary = SessionSummary::new(
        session_id,
        started_at,
        Utc::now(),
        outcome.reason.unwrap_or(reason),
        perception.stats(),
        alerts,
        outcome.actuator,
    );
    info!("Session ended: {}", summary.stop_reason);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_reason_serialization() {
        let json = serde_json::to_string(&StopReason::EndOfStream).unwrap();
        assert_eq!(json, "\"end_of_stream\"");
        assert_eq!(StopReason::OperatorQuit.to_string(), "operator quit");
    }

    #[test]
    fn test_config_error_conversion() {
        let err: MonitorError = config::ConfigError::Message("bad".into()).into();
        assert!(matches!(err, MonitorError::Config(m) if m == "bad"));
    }
}

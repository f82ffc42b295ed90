//! Perception-side resources

use alerting::{AlertCoordinator, AlertStats, AudioAlertDevice};
use camera_capture::FrameSource;
use dms::{DmsModule, LandmarkSource};
use tracing::info;

/// Everything the perception loop owns: video in, landmarks, audio out.
///
/// The actuator lives on its own thread and is not part of this.
pub struct AppContext<C, L, A> {
    pub camera: C,
    pub dms: DmsModule<L>,
    pub alerts: AlertCoordinator<A>,
}

impl<C, L, A> AppContext<C, L, A>
where
    C: FrameSource,
    L: LandmarkSource,
    A: AudioAlertDevice,
{
    pub fn new(camera: C, dms: DmsModule<L>, alerts: AlertCoordinator<A>) -> Self {
        Self { camera, dms, alerts }
    }

    /// Stop the alert, release audio, then release video.
    ///
    /// Call after the actuator has been joined.
    pub fn teardown(self) -> AlertStats {
        let mut alerts = self.alerts;
        alerts.silence();
        let stats = alerts.stats();
        drop(alerts.into_device());
        info!("Audio released");

        drop(self.dms);
        drop(self.camera);
        info!("Video released");
        stats
    }
}

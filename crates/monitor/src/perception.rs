//! Per-frame perception loop

use crate::context::AppContext;
use crate::controls::OperatorControls;
use crate::shutdown::ShutdownCoordinator;
use crate::StopReason;
use alerting::AudioAlertDevice;
use camera_capture::FrameSource;
use dms::{DmsError, FrameAnalysis, LandmarkSource, StateEdge};
use haptics::SharedSignal;
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// Frame counters for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    /// Frames that produced a state update
    pub frames: u64,
    /// Frames dropped because landmark extraction failed
    pub skipped_frames: u64,
    /// Frames without a detected face
    pub no_face_frames: u64,
    /// Frames spent in the drowsy state
    pub drowsy_frames: u64,
    /// Normal -> Drowsy transitions
    pub drowsy_episodes: u64,
}

/// Runs the capture -> analyze -> publish -> alert cycle until a stop
/// condition is met.
#[derive(Debug)]
pub struct Perception {
    require_actuator: bool,
    actuator_lost: bool,
    stats: FrameStats,
}

impl Perception {
    pub fn new(require_actuator: bool) -> Self {
        Self {
            require_actuator,
            actuator_lost: false,
            stats: FrameStats::default(),
        }
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Loop until a stop condition, record it on the coordinator and
    /// return it.
    pub fn run<C, L, A>(
        &mut self,
        ctx: &mut AppContext<C, L, A>,
        coordinator: &mut ShutdownCoordinator,
        controls: &dyn OperatorControls,
    ) -> StopReason
    where
        C: FrameSource,
        L: LandmarkSource,
        A: AudioAlertDevice,
    {
        info!("Perception loop started");
        loop {
            if let Some(reason) = self.step(ctx, coordinator, controls) {
                coordinator.request_stop(reason);
                info!("Perception loop ended after {} frames: {}", self.stats.frames, reason);
                return reason;
            }
        }
    }

    /// Process one frame. Returns `Some` when the session should end.
    pub fn step<C, L, A>(
        &mut self,
        ctx: &mut AppContext<C, L, A>,
        coordinator: &ShutdownCoordinator,
        controls: &dyn OperatorControls,
    ) -> Option<StopReason>
    where
        C: FrameSource,
        L: LandmarkSource,
        A: AudioAlertDevice,
    {
        let frame = match ctx.camera.next_frame() {
            Ok(frame) => frame,
            Err(e) if e.is_end_of_stream() => {
                info!("{}", e);
                return Some(StopReason::EndOfStream);
            }
            Err(e) => {
                error!("Frame capture failed: {}", e);
                return Some(StopReason::FrameSourceFailed);
            }
        };

        match ctx.dms.analyze(&frame) {
            Ok(analysis) => self.apply(&analysis, ctx, coordinator.signal()),
            Err(DmsError::SourceExhausted) => {
                info!("Landmark source exhausted at frame {}", frame.sequence);
                return Some(StopReason::EndOfStream);
            }
            Err(e) => {
                self.stats.skipped_frames += 1;
                warn!("Frame {} skipped: {}", frame.sequence, e);
            }
        }

        if let Some(reason) = controls.poll() {
            return Some(reason);
        }

        self.check_actuator(coordinator)
    }

    fn apply<C, L, A: AudioAlertDevice>(
        &mut self,
        analysis: &FrameAnalysis,
        ctx: &mut AppContext<C, L, A>,
        signal: &SharedSignal,
    ) {
        self.stats.frames += 1;
        if !analysis.face_detected() {
            self.stats.no_face_frames += 1;
        }
        if analysis.is_drowsy() {
            self.stats.drowsy_frames += 1;
        }

        // actuator first; audio may block on the device
        signal.set_drowsy(analysis.is_drowsy());

        if let Some(edge) = analysis.edge {
            if edge == StateEdge::EnteredDrowsy {
                self.stats.drowsy_episodes += 1;
            }
            ctx.alerts.on_edge(edge);
        }

        debug!(
            "Frame {}: EAR {:.2} {:?}",
            analysis.sequence,
            analysis.ear.value(),
            analysis.state
        );
    }

    fn check_actuator(&mut self, coordinator: &ShutdownCoordinator) -> Option<StopReason> {
        if self.actuator_lost || !coordinator.actuator_exited_early() {
            return None;
        }

        self.actuator_lost = true;
        if self.require_actuator {
            error!("Actuator loop exited; stopping session");
            Some(StopReason::ActuatorFailed)
        } else {
            warn!("Actuator loop exited; continuing with audio alerts only");
            None
        }
    }
}

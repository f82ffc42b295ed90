//! Alert Coordinator Implementation

use crate::device::AudioAlertDevice;
use dms::StateEdge;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Command issued to the audio device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertCommand {
    Start,
    Stop,
}

/// Commands issued so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlertStats {
    pub starts: u64,
    pub stops: u64,
    pub failures: u64,
}

/// Converts state edges into exactly one start and one stop per
/// Normal -> Drowsy -> Normal cycle.
///
/// Owned by the perception loop; the `playing` flag never leaves it.
pub struct AlertCoordinator<A> {
    device: A,
    playing: bool,
    stats: AlertStats,
}

impl<A: AudioAlertDevice> AlertCoordinator<A> {
    /// Create a new alert coordinator around an audio device
    pub fn new(device: A) -> Self {
        Self {
            device,
            playing: false,
            stats: AlertStats::default(),
        }
    }

    /// React to a state edge. Returns the command that was issued, if any.
    ///
    /// Device errors are logged and swallowed.
    pub fn on_edge(&mut self, edge: StateEdge) -> Option<AlertCommand> {
        match edge {
            StateEdge::EnteredDrowsy => self.start(),
            StateEdge::ExitedDrowsy => self.stop(),
        }
    }

    fn start(&mut self) -> Option<AlertCommand> {
        if self.playing {
            debug!("Alert already playing");
            return None;
        }

        self.stats.starts += 1;
        metrics::counter!("alert_starts_total").increment(1);
        match self.device.play_looped() {
            Ok(()) => {
                info!("Alert started (count: {})", self.stats.starts);
                self.playing = true;
            }
            Err(e) => {
                self.stats.failures += 1;
                warn!("Alert start failed: {}", e);
            }
        }
        Some(AlertCommand::Start)
    }

    fn stop(&mut self) -> Option<AlertCommand> {
        if !self.playing {
            debug!("Alert not playing");
            return None;
        }

        self.stats.stops += 1;
        metrics::counter!("alert_stops_total").increment(1);
        if let Err(e) = self.device.stop() {
            self.stats.failures += 1;
            warn!("Alert stop failed: {}", e);
        } else {
            info!("Alert stopped (count: {})", self.stats.stops);
        }
        self.playing = false;
        Some(AlertCommand::Stop)
    }

    /// Stop playback if playing (teardown)
    pub fn silence(&mut self) -> Option<AlertCommand> {
        self.stop()
    }

    /// Whether the alert is currently playing
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Commands issued so far
    pub fn stats(&self) -> AlertStats {
        self.stats
    }

    /// Release the device
    pub fn into_device(self) -> A {
        self.device
    }
}

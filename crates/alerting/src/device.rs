//! Audio alert device capability

use thiserror::Error;
use tracing::{info, warn};

/// Audio device errors. Never fatal to the perception loop.
#[derive(Debug, Clone, Error)]
pub enum AudioError {
    #[error("Playback failed: {0}")]
    Playback(String),
}

/// A device that can loop an alert sound.
///
/// Both calls must be no-ops when the device is already in the requested
/// state.
pub trait AudioAlertDevice: Send {
    /// Start playing the alert on repeat
    fn play_looped(&mut self) -> Result<(), AudioError>;

    /// Stop the alert
    fn stop(&mut self) -> Result<(), AudioError>;
}

impl<D: AudioAlertDevice + ?Sized> AudioAlertDevice for Box<D> {
    fn play_looped(&mut self) -> Result<(), AudioError> {
        (**self).play_looped()
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        (**self).stop()
    }
}

/// Headless audio device that reports the alert through the log
#[derive(Debug, Default)]
pub struct TracingAudio {
    playing: bool,
}

impl TracingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl AudioAlertDevice for TracingAudio {
    fn play_looped(&mut self) -> Result<(), AudioError> {
        if !self.playing {
            warn!("DROWSY - audio alert playing");
            self.playing = true;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        if self.playing {
            info!("Audio alert stopped");
            self.playing = false;
        }
        Ok(())
    }
}

impl Drop for TracingAudio {
    fn drop(&mut self) {
        if self.playing {
            warn!("Audio device released while playing");
        }
        info!("Audio device released");
    }
}

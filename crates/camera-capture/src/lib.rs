//! Camera Capture Library
//!
//! Provides the frame types and the blocking frame-source capability used by
//! the perception loop. Supports:
//! - Cabin camera frames (640x480 @ 15fps by default)
//! - A synthetic camera for headless runs and landmark replays
//! - Scripted sources for tests (see [`mock`])

pub mod frame;
pub mod mock;
pub mod source;

pub use frame::VideoFrame;
pub use source::{FrameSource, SyntheticCamera};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Camera error types
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Invalid camera configuration: {0}")]
    Config(String),

    #[error("Invalid format: {0}")]
    Format(String),

    #[error("Streaming error: {0}")]
    Stream(String),

    /// The source has no more frames (file replay finished, device unplugged)
    #[error("End of stream after {0} frames")]
    EndOfStream(u32),
}

impl CameraError {
    /// Whether the error is a clean end of stream rather than a failure
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, CameraError::EndOfStream(_))
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Capture width
    pub width: u32,
    /// Capture height
    pub height: u32,
    /// Target FPS
    pub fps: u32,
    /// Stop after this many frames (synthetic camera only)
    pub frame_limit: Option<u32>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 15,
            frame_limit: None,
        }
    }
}

/// Largest accepted frame side (pixels)
pub const MAX_DIMENSION: u32 = 8192;

impl CameraConfig {
    pub fn validate(&self) -> Result<(), CameraError> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if value == 0 || value > MAX_DIMENSION {
                return Err(CameraError::Config(format!(
                    "{} must be in 1..={}, got {}",
                    name, MAX_DIMENSION, value
                )));
            }
        }
        if self.fps == 0 {
            return Err(CameraError::Config("fps must be at least 1".into()));
        }
        Ok(())
    }

    /// Time between two frames at the target rate
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_micros(1_000_000 / u64::from(self.fps.max(1)))
    }
}

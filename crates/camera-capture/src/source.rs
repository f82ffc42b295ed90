//! Blocking frame sources

use crate::{CameraConfig, CameraError, VideoFrame};
use std::time::Instant;
use tracing::{debug, info};

/// A blocking source of video frames.
///
/// `next_frame` blocks until a frame is available. A source that has run out
/// of frames returns [`CameraError::EndOfStream`]; any other error is a
/// capture failure.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError> {
        (**self).next_frame()
    }
}

/// Camera that produces blank frames at the configured rate.
///
/// Used for headless runs where landmarks come from a recording rather than
/// from the pixels.
pub struct SyntheticCamera {
    config: CameraConfig,
    started: Instant,
    next_due: Instant,
    sequence: u32,
}

impl SyntheticCamera {
    pub fn new(config: CameraConfig) -> Self {
        info!(
            "Synthetic camera {}x{} @ {}fps (limit: {:?})",
            config.width, config.height, config.fps, config.frame_limit
        );
        let now = Instant::now();
        Self {
            config,
            started: now,
            next_due: now,
            sequence: 0,
        }
    }

    /// Frames produced so far
    pub fn frames_produced(&self) -> u32 {
        self.sequence
    }
}

impl FrameSource for SyntheticCamera {
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError> {
        if let Some(limit) = self.config.frame_limit {
            if self.sequence >= limit {
                return Err(CameraError::EndOfStream(self.sequence));
            }
        }

        let now = Instant::now();
        if self.next_due > now {
            std::thread::sleep(self.next_due - now);
        }
        self.next_due += self.config.frame_interval();

        let frame = VideoFrame::blank(
            self.config.width,
            self.config.height,
            self.started.elapsed().as_nanos() as u64,
            self.sequence,
        )?;
        self.sequence += 1;
        debug!("Synthetic frame {}", frame.sequence);
        Ok(frame)
    }
}

impl Drop for SyntheticCamera {
    fn drop(&mut self) {
        info!("Synthetic camera released after {} frames", self.sequence);
    }
}

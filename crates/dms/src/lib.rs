//! Driver Monitoring System (DMS)
//!
//! Turns per-frame facial landmarks into a drowsiness signal:
//! - Eye aspect ratio (EAR) from six eyelid points per eye
//! - Threshold state machine with edge detection (Normal / Drowsy)
//! - Optional majority-vote smoothing and no-face policy
//! - Landmark replay from JSON-lines recordings

pub mod analysis;
pub mod config;
pub mod ear;
pub mod landmarks;
pub mod mock;
pub mod replay;
pub mod state;

pub use analysis::FrameAnalysis;
pub use config::{DmsConfig, NoFacePolicy};
pub use ear::{eye_aspect_ratio, EarReading, EarSample, EyeShape};
pub use landmarks::{FaceLandmarks, LandmarkLayout, LandmarkPoint, LandmarkSource};
pub use replay::ReplayLandmarks;
pub use state::{DrowsinessStateMachine, DrowsyState, StateEdge};

use camera_capture::VideoFrame;
use thiserror::Error;
use tracing::debug;

/// DMS error types
#[derive(Error, Debug)]
pub enum DmsError {
    #[error("Eye shape needs exactly 6 landmarks, got {0}")]
    InvalidEyeShape(usize),

    #[error("Degenerate eye contour: corners coincide")]
    DegenerateEye,

    #[error("Invalid landmarks: {0}")]
    Landmarks(String),

    #[error("Landmark detection failed: {0}")]
    Detection(String),

    #[error("Landmark source exhausted")]
    SourceExhausted,

    #[error("Replay file error: {0}")]
    Replay(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),
}

/// Driver monitoring module: landmark source + EAR + state machine
pub struct DmsModule<L> {
    source: L,
    machine: DrowsinessStateMachine,
}

impl<L: LandmarkSource> DmsModule<L> {
    /// Create a new DMS module with configuration
    pub fn new(config: &DmsConfig, source: L) -> Result<Self, DmsError> {
        config.validate()?;
        Ok(Self {
            source,
            machine: DrowsinessStateMachine::new(config),
        })
    }

    /// Analyze a single frame for driver state
    pub fn analyze(&mut self, frame: &VideoFrame) -> Result<FrameAnalysis, DmsError> {
        let gray = frame
            .to_grayscale()
            .map_err(|e| DmsError::ImageProcessing(e.to_string()))?;

        let face = self.source.detect(&gray)?;
        let reading = ear::reading_from_face(face.as_ref())?;
        let (ear, edge) = match reading {
            Some(r) => (r.sample, self.machine.update(r.sample)),
            None => (EarSample::NO_FACE, self.machine.update_no_face()),
        };

        metrics::gauge!("dms_ear").set(ear.value());
        if reading.is_none() {
            metrics::counter!("dms_no_face_frames_total").increment(1);
        }
        debug!("Frame {}: EAR {:.2} state {:?}", frame.sequence, ear.value(), self.machine.state());

        Ok(FrameAnalysis {
            sequence: frame.sequence,
            timestamp_ns: frame.timestamp_ns,
            reading,
            ear,
            state: self.machine.state(),
            edge,
        })
    }

    /// Current drowsiness state
    pub fn state(&self) -> DrowsyState {
        self.machine.state()
    }

    /// Reset driver state (on driver change)
    pub fn reset_state(&mut self) {
        self.machine.reset();
    }
}

//! DMS per-frame analysis results

use crate::ear::{EarReading, EarSample};
use crate::state::{DrowsyState, StateEdge};
use serde::{Deserialize, Serialize};

/// Result of analysing one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameAnalysis {
    /// Frame sequence number
    pub sequence: u32,

    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,

    /// Per-eye ratios (absent when no face was found)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading: Option<EarReading>,

    /// Combined EAR, or the no-face sentinel
    pub ear: EarSample,

    /// State after this frame
    pub state: DrowsyState,

    /// Transition caused by this frame
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge: Option<StateEdge>,
}

impl FrameAnalysis {
    /// Whether a face was detected
    pub fn face_detected(&self) -> bool {
        self.reading.is_some()
    }

    pub fn is_drowsy(&self) -> bool {
        self.state.is_drowsy()
    }
}

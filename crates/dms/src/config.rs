//! DMS configuration

use crate::DmsError;
use serde::{Deserialize, Serialize};

/// What a "no face" frame means to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoFacePolicy {
    /// The sentinel EAR of 0 is an ordinary sample below threshold
    #[default]
    TreatAsClosed,
    /// Frames without a face do not vote and cannot cause a transition
    HoldState,
}

/// DMS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DmsConfig {
    /// EAR below this value counts as eyes closed
    pub ear_threshold: f64,

    /// Number of recent samples in the majority vote (1 = raw threshold)
    pub smoothing_window: usize,

    /// Handling of frames where no face was detected
    pub no_face_policy: NoFacePolicy,
}

impl Default for DmsConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.26,
            smoothing_window: 1,
            no_face_policy: NoFacePolicy::TreatAsClosed,
        }
    }
}

impl DmsConfig {
    /// Majority vote over the last `window` frames
    pub fn debounced(window: usize) -> Self {
        Self {
            smoothing_window: window,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), DmsError> {
        if !(self.ear_threshold > 0.0 && self.ear_threshold < 1.0) {
            return Err(DmsError::Config(format!(
                "ear_threshold must be in (0, 1), got {}",
                self.ear_threshold
            )));
        }
        if self.smoothing_window == 0 {
            return Err(DmsError::Config("smoothing_window must be at least 1".into()));
        }
        Ok(())
    }
}

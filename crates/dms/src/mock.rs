//! Scripted landmark source for tests

use crate::landmarks::{FaceLandmarks, LandmarkLayout, LandmarkPoint, LandmarkSource};
use crate::DmsError;
use image::GrayImage;
use std::collections::VecDeque;

/// Face whose both eyes have exactly the given aspect ratio
/// (eyes-only layout, 100px wide eyes)
pub fn synthetic_face(ear: f64) -> FaceLandmarks {
    let eye = |offset: f64| {
        let h = ear * 100.0 / 2.0;
        [
            (offset, 0.0),
            (offset + 33.0, -h),
            (offset + 67.0, -h),
            (offset + 100.0, 0.0),
            (offset + 67.0, h),
            (offset + 33.0, h),
        ]
        .map(LandmarkPoint::from)
    };

    let mut points = eye(0.0).to_vec();
    points.extend(eye(200.0));
    FaceLandmarks {
        layout: LandmarkLayout::EyesOnly,
        points,
    }
}

/// One scripted detection result
#[derive(Debug, Clone)]
pub enum ScriptedDetection {
    Ear(f64),
    NoFace,
    Fail(String),
}

/// Landmark source that returns a fixed script, then reports exhaustion
#[derive(Debug, Clone)]
pub struct ScriptedLandmarks {
    script: VecDeque<ScriptedDetection>,
}

impl ScriptedLandmarks {
    pub fn new(script: impl IntoIterator<Item = ScriptedDetection>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    pub fn from_ears(ears: &[f64]) -> Self {
        Self::new(ears.iter().map(|&e| ScriptedDetection::Ear(e)))
    }
}

impl LandmarkSource for ScriptedLandmarks {
    fn detect(&mut self, _frame: &GrayImage) -> Result<Option<FaceLandmarks>, DmsError> {
        match self.script.pop_front() {
            Some(ScriptedDetection::Ear(ear)) => Ok(Some(synthetic_face(ear))),
            Some(ScriptedDetection::NoFace) => Ok(None),
            Some(ScriptedDetection::Fail(reason)) => Err(DmsError::Detection(reason)),
            None => Err(DmsError::SourceExhausted),
        }
    }
}

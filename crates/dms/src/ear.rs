//! Eye Aspect Ratio (EAR)
//!
//! EAR = (|p1 - p5| + |p2 - p4|) / (2 * |p0 - p3|)
//!
//! Roughly 0.3 for an open eye, approaching 0 as the lids close.

use crate::landmarks::{FaceLandmarks, LandmarkPoint};
use crate::DmsError;
use serde::{Deserialize, Serialize};

/// Points per eye contour
pub const EYE_POINTS: usize = 6;

/// Six eyelid contour points: outer corner, upper lid (2), inner corner,
/// lower lid (2)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeShape([LandmarkPoint; EYE_POINTS]);

impl EyeShape {
    pub fn new(points: &[LandmarkPoint]) -> Result<Self, DmsError> {
        <[LandmarkPoint; EYE_POINTS]>::try_from(points)
            .map(Self)
            .map_err(|_| DmsError::InvalidEyeShape(points.len()))
    }

    pub fn points(&self) -> &[LandmarkPoint; EYE_POINTS] {
        &self.0
    }

    /// Openness ratio of this eye
    pub fn aspect_ratio(&self) -> Result<f64, DmsError> {
        let p = &self.0;
        let vertical_a = p[1].distance(&p[5]);
        let vertical_b = p[2].distance(&p[4]);
        let horizontal = p[0].distance(&p[3]);

        if horizontal <= f64::EPSILON {
            return Err(DmsError::DegenerateEye);
        }

        Ok((vertical_a + vertical_b) / (2.0 * horizontal))
    }
}

/// Per-frame EAR rounded to two decimals.
///
/// `0.0` doubles as the "no face" sentinel: it means no reliable reading,
/// not necessarily closed eyes.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EarSample(f64);

impl EarSample {
    pub const NO_FACE: EarSample = EarSample(0.0);

    /// Round a raw ratio to two decimals
    pub fn new(raw: f64) -> Self {
        Self((raw * 100.0).round() / 100.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether the value equals the sentinel. A face with shut eyes can
    /// read 0.00 too; face presence comes from the detection result.
    pub fn is_no_face(self) -> bool {
        self.0 == 0.0
    }
}

/// Both eyes' ratios and the combined sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarReading {
    pub left: f64,
    pub right: f64,
    pub sample: EarSample,
}

/// Mean EAR of both eyes, rounded
pub fn eye_aspect_ratio(left: &EyeShape, right: &EyeShape) -> Result<EarReading, DmsError> {
    let left = left.aspect_ratio()?;
    let right = right.aspect_ratio()?;
    Ok(EarReading {
        left,
        right,
        sample: EarSample::new((left + right) / 2.0),
    })
}

/// EAR for a frame's detection result; no face gives the sentinel
pub fn reading_from_face(face: Option<&FaceLandmarks>) -> Result<Option<EarReading>, DmsError> {
    match face {
        Some(face) => {
            let (left, right) = face.eyes()?;
            eye_aspect_ratio(&left, &right).map(Some)
        }
        None => Ok(None),
    }
}

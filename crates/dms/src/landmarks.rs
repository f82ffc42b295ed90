//! Facial landmarks and the landmark-source capability

use crate::ear::EyeShape;
use crate::DmsError;
use image::GrayImage;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A single detected facial-feature coordinate (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f64,
    pub y: f64,
}

impl LandmarkPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &LandmarkPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for LandmarkPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Where the eye contours sit inside a landmark set.
///
/// Each eye is six points in eyelid order: outer corner, two upper-lid points,
/// inner corner, two lower-lid points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkLayout {
    /// 12 points: left eye 0..6, right eye 6..12
    #[default]
    EyesOnly,
    /// 68-point face model: left eye 36..42, right eye 42..48
    Dlib68,
}

impl LandmarkLayout {
    pub fn left_eye(self) -> Range<usize> {
        match self {
            LandmarkLayout::EyesOnly => 0..6,
            LandmarkLayout::Dlib68 => 36..42,
        }
    }

    pub fn right_eye(self) -> Range<usize> {
        match self {
            LandmarkLayout::EyesOnly => 6..12,
            LandmarkLayout::Dlib68 => 42..48,
        }
    }

    /// Minimum number of points a landmark set must carry for this layout
    pub fn required_points(self) -> usize {
        self.left_eye().end.max(self.right_eye().end)
    }
}

/// Landmarks of one detected face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceLandmarks {
    #[serde(default)]
    pub layout: LandmarkLayout,
    pub points: Vec<LandmarkPoint>,
}

impl FaceLandmarks {
    pub fn new(layout: LandmarkLayout, points: Vec<LandmarkPoint>) -> Result<Self, DmsError> {
        let face = Self { layout, points };
        face.validate()?;
        Ok(face)
    }

    /// Check that both eye contours are present
    pub fn validate(&self) -> Result<(), DmsError> {
        let required = self.layout.required_points();
        if self.points.len() < required {
            return Err(DmsError::Landmarks(format!(
                "{:?} layout needs {} points, got {}",
                self.layout,
                required,
                self.points.len()
            )));
        }
        Ok(())
    }

    /// Extract the (left, right) eye contours
    pub fn eyes(&self) -> Result<(EyeShape, EyeShape), DmsError> {
        self.validate()?;
        let left = EyeShape::new(&self.points[self.layout.left_eye()])?;
        let right = EyeShape::new(&self.points[self.layout.right_eye()])?;
        Ok((left, right))
    }
}

/// Source of facial landmarks (the detection model lives behind this).
///
/// Returns `Ok(None)` when no face is visible in the frame. A source that
/// has nothing left to give (finished recording) returns
/// [`DmsError::SourceExhausted`].
pub trait LandmarkSource: Send {
    fn detect(&mut self, frame: &GrayImage) -> Result<Option<FaceLandmarks>, DmsError>;
}

impl<S: LandmarkSource + ?Sized> LandmarkSource for Box<S> {
    fn detect(&mut self, frame: &GrayImage) -> Result<Option<FaceLandmarks>, DmsError> {
        (**self).detect(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = LandmarkPoint::new(0.0, 0.0);
        let b = LandmarkPoint::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_layout_ranges() {
        assert_eq!(LandmarkLayout::EyesOnly.required_points(), 12);
        assert_eq!(LandmarkLayout::Dlib68.required_points(), 48);
        assert_eq!(LandmarkLayout::Dlib68.left_eye(), 36..42);
    }

    #[test]
    fn test_too_few_points_rejected() {
        let points = vec![LandmarkPoint::new(0.0, 0.0); 11];
        let err = FaceLandmarks::new(LandmarkLayout::EyesOnly, points).unwrap_err();
        assert!(matches!(err, DmsError::Landmarks(_)));
    }

    #[test]
    fn test_dlib_layout_picks_eye_slices() {
        let points: Vec<_> = (0..68)
            .map(|i| LandmarkPoint::new(i as f64, 0.0))
            .collect();
        let face = FaceLandmarks::new(LandmarkLayout::Dlib68, points).unwrap();
        let (left, right) = face.eyes().unwrap();

        assert_eq!(left.points()[0].x, 36.0);
        assert_eq!(right.points()[5].x, 47.0);
    }

    #[test]
    fn test_layout_defaults_when_missing_from_json() {
        let json = r#"{"points":[]}"#;
        let face: FaceLandmarks = serde_json::from_str(json).unwrap();
        assert_eq!(face.layout, LandmarkLayout::EyesOnly);
    }
}

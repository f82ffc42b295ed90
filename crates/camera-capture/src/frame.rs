//! Video frame types and processing

use crate::CameraError;
use image::{GrayImage, ImageBuffer, Rgb};

/// Decoded RGB video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u32,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_ns: u64, sequence: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp_ns,
            sequence,
        }
    }

    /// Bytes of an RGB24 frame, or `None` if it does not fit in memory
    pub fn rgb_len(width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(3)
    }

    /// Create a black frame of the given size
    pub fn blank(
        width: u32,
        height: u32,
        timestamp_ns: u64,
        sequence: u32,
    ) -> Result<Self, CameraError> {
        let len = Self::rgb_len(width, height).ok_or_else(|| {
            CameraError::Format(format!("{}x{} frame is too large", width, height))
        })?;
        Ok(Self::new(vec![0; len], width, height, timestamp_ns, sequence))
    }

    /// Get pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        self.data
            .get(idx..idx + 3)
            .map(|p| [p[0], p[1], p[2]])
    }

    /// Convert to a single-channel luminance image, the input landmark
    /// detectors expect
    pub fn to_grayscale(&self) -> Result<GrayImage, CameraError> {
        let rgb = ImageBuffer::<Rgb<u8>, &[u8]>::from_raw(
            self.width,
            self.height,
            self.data.as_slice(),
        )
        .ok_or_else(|| {
            CameraError::Format(format!(
                "frame {} has {} bytes, expected {:?} for {}x{} RGB",
                self.sequence,
                self.data.len(),
                Self::rgb_len(self.width, self.height),
                self.width,
                self.height
            ))
        })?;

        Ok(image::imageops::grayscale(&rgb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_pixel_bounds() {
        let mut frame = VideoFrame::blank(4, 2, 0, 0).unwrap();
        frame.data[(1 * 4 + 3) * 3] = 200;

        assert_eq!(frame.get_pixel(3, 1), Some([200, 0, 0]));
        assert_eq!(frame.get_pixel(4, 0), None);
        assert_eq!(frame.get_pixel(0, 2), None);
    }

    #[test]
    fn test_grayscale_conversion() {
        let mut frame = VideoFrame::blank(2, 1, 0, 7).unwrap();
        frame.data[0..3].copy_from_slice(&[255, 255, 255]);

        let gray = frame.to_grayscale().unwrap();
        assert_eq!(gray.dimensions(), (2, 1));
        assert_eq!(gray.get_pixel(0, 0)[0], 255);
        assert_eq!(gray.get_pixel(1, 0)[0], 0);
    }

    #[test]
    fn test_oversized_frame_rejected_without_overflow() {
        assert_eq!(VideoFrame::rgb_len(640, 480), Some(640 * 480 * 3));

        let err = VideoFrame::blank(u32::MAX, u32::MAX, 0, 0).unwrap_err();
        assert!(matches!(err, CameraError::Format(_)));

        let frame = VideoFrame::new(Vec::new(), u32::MAX, u32::MAX, 0, 0);
        assert!(frame.get_pixel(u32::MAX - 1, u32::MAX - 1).is_none());
        assert!(frame.to_grayscale().is_err());
    }

    #[test]
    fn test_grayscale_rejects_short_buffer() {
        let frame = VideoFrame::new(vec![0; 5], 2, 2, 0, 1);
        let err = frame.to_grayscale().unwrap_err();
        assert!(matches!(err, CameraError::Format(_)));
    }
}

//! Landmark replay from JSON-lines recordings
//!
//! One line per frame: `null` when no face was visible, otherwise a
//! [`FaceLandmarks`] object, e.g.
//! `{"layout":"eyes_only","points":[{"x":1.0,"y":2.0}, ...]}`.
//! Blank lines are ignored.

use crate::landmarks::{FaceLandmarks, LandmarkSource};
use crate::DmsError;
use image::GrayImage;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// Landmark source that plays back a recording, one entry per frame
#[derive(Debug, Clone)]
pub struct ReplayLandmarks {
    frames: VecDeque<Option<FaceLandmarks>>,
    total: usize,
}

impl ReplayLandmarks {
    /// Load a recording from disk
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DmsError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| DmsError::Replay(format!("{}: {}", path.display(), e)))?;
        let replay = Self::from_reader(BufReader::new(file))?;
        info!("Loaded {} landmark frames from {}", replay.total, path.display());
        Ok(replay)
    }

    /// Parse a recording from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, DmsError> {
        let mut frames = VecDeque::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| DmsError::Replay(format!("line {}: {}", index + 1, e)))?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: Option<FaceLandmarks> = serde_json::from_str(&line)
                .map_err(|e| DmsError::Replay(format!("line {}: {}", index + 1, e)))?;
            if let Some(face) = &entry {
                face.validate()
                    .map_err(|e| DmsError::Replay(format!("line {}: {}", index + 1, e)))?;
            }
            frames.push_back(entry);
        }

        let total = frames.len();
        Ok(Self { frames, total })
    }

    /// Frames left to play
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    /// Frames in the recording
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl LandmarkSource for ReplayLandmarks {
    fn detect(&mut self, _frame: &GrayImage) -> Result<Option<FaceLandmarks>, DmsError> {
        self.frames.pop_front().ok_or(DmsError::SourceExhausted)
    }
}

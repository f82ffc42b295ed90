//! Scripted frame source for tests

use crate::{CameraError, FrameSource, VideoFrame};
use std::collections::VecDeque;

/// One scripted outcome of `next_frame`
#[derive(Debug)]
pub enum ScriptedFrame {
    Frame,
    Fail(String),
}

/// Frame source that replays a fixed script without pacing.
///
/// Once the script is exhausted it reports end of stream.
#[derive(Debug)]
pub struct ScriptedCamera {
    script: VecDeque<ScriptedFrame>,
    sequence: u32,
}

impl ScriptedCamera {
    pub fn new(script: impl IntoIterator<Item = ScriptedFrame>) -> Self {
        Self {
            script: script.into_iter().collect(),
            sequence: 0,
        }
    }

    /// Camera that yields `count` blank frames, then end of stream
    pub fn frames(count: usize) -> Self {
        Self::new((0..count).map(|_| ScriptedFrame::Frame))
    }
}

impl FrameSource for ScriptedCamera {
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError> {
        match self.script.pop_front() {
            Some(ScriptedFrame::Frame) => {
                let timestamp_ns = u64::from(self.sequence) * 1_000_000;
                let frame = VideoFrame::blank(4, 4, timestamp_ns, self.sequence)?;
                self.sequence += 1;
                Ok(frame)
            }
            Some(ScriptedFrame::Fail(reason)) => Err(CameraError::Stream(reason)),
            None => Err(CameraError::EndOfStream(self.sequence)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_order() {
        let mut camera = ScriptedCamera::new([
            ScriptedFrame::Frame,
            ScriptedFrame::Fail("cable".into()),
        ]);

        assert_eq!(camera.next_frame().unwrap().sequence, 0);
        assert!(matches!(camera.next_frame(), Err(CameraError::Stream(_))));
        assert!(camera.next_frame().unwrap_err().is_end_of_stream());
    }
}

//! Recording audio device for tests

use crate::device::{AudioAlertDevice, AudioError};
use parking_lot::Mutex;
use std::sync::Arc;

/// A call made on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCall {
    Play,
    Stop,
}

#[derive(Debug, Default)]
struct Inner {
    calls: Vec<AudioCall>,
    fail_play: bool,
    fail_stop: bool,
}

/// Audio device that records every call. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    inner: Arc<Mutex<Inner>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<AudioCall> {
        self.inner.lock().calls.clone()
    }

    pub fn count(&self, call: AudioCall) -> usize {
        self.inner.lock().calls.iter().filter(|&&c| c == call).count()
    }

    pub fn fail_next_play(&self) {
        self.inner.lock().fail_play = true;
    }

    pub fn fail_next_stop(&self) {
        self.inner.lock().fail_stop = true;
    }
}

impl AudioAlertDevice for RecordingAudio {
    fn play_looped(&mut self) -> Result<(), AudioError> {
        let mut inner = self.inner.lock();
        inner.calls.push(AudioCall::Play);
        if std::mem::take(&mut inner.fail_play) {
            return Err(AudioError::Playback("injected".into()));
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        let mut inner = self.inner.lock();
        inner.calls.push(AudioCall::Stop);
        if std::mem::take(&mut inner.fail_stop) {
            return Err(AudioError::Playback("injected".into()));
        }
        Ok(())
    }
}

//! Recording haptic driver for tests

use crate::{HapticDriver, HapticError, Intensity};
use parking_lot::Mutex;
use std::sync::Arc;

/// A call made on the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticCall {
    Initialize,
    SetEffect { channel: u8, intensity: u8 },
    Flush,
    Shutdown,
}

#[derive(Debug, Default)]
struct Inner {
    calls: Vec<HapticCall>,
    fail_init: bool,
    /// Successful `set_effect` calls left before one injected failure
    set_effect_budget: Option<usize>,
}

/// Driver that records every call. Clones share the same log, so a test
/// keeps one clone while the actuator thread owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingHaptics {
    inner: Arc<Mutex<Inner>>,
}

impl RecordingHaptics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<HapticCall> {
        self.inner.lock().calls.clone()
    }

    pub fn count(&self, call: HapticCall) -> usize {
        self.inner.lock().calls.iter().filter(|&&c| c == call).count()
    }

    /// Intensities passed to `set_effect`, in order
    pub fn intensities(&self) -> Vec<u8> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                HapticCall::SetEffect { intensity, .. } => Some(*intensity),
                _ => None,
            })
            .collect()
    }

    pub fn last_intensity(&self) -> Option<u8> {
        self.intensities().last().copied()
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.lock().calls.last() == Some(&HapticCall::Shutdown)
    }

    /// Make the next `initialize` fail
    pub fn fail_init(&self) {
        self.inner.lock().fail_init = true;
    }

    /// Let `n` more `set_effect` calls succeed, then fail one
    pub fn fail_set_effect_after(&self, n: usize) {
        self.inner.lock().set_effect_budget = Some(n);
    }
}

impl HapticDriver for RecordingHaptics {
    fn initialize(&mut self) -> Result<(), HapticError> {
        let mut inner = self.inner.lock();
        inner.calls.push(HapticCall::Initialize);
        if std::mem::take(&mut inner.fail_init) {
            return Err(HapticError::Init("injected".into()));
        }
        Ok(())
    }

    fn set_effect(&mut self, channel: u8, intensity: Intensity) -> Result<(), HapticError> {
        let mut inner = self.inner.lock();
        inner.calls.push(HapticCall::SetEffect {
            channel,
            intensity: intensity.value(),
        });
        match inner.set_effect_budget {
            Some(0) => {
                inner.set_effect_budget = None;
                Err(HapticError::Device("injected".into()))
            }
            Some(n) => {
                inner.set_effect_budget = Some(n - 1);
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn flush(&mut self) -> Result<(), HapticError> {
        self.inner.lock().calls.push(HapticCall::Flush);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), HapticError> {
        self.inner.lock().calls.push(HapticCall::Shutdown);
        Ok(())
    }
}

//! Signal shared between the perception loop and the actuator loop

use std::sync::atomic::{AtomicBool, Ordering};

/// Drowsy flag (written by perception, read by the actuator) and a one-shot
/// stop flag.
///
/// Both are single scalars, so atomics are enough; no lock is held anywhere.
#[derive(Debug, Default)]
pub struct SharedSignal {
    drowsy: AtomicBool,
    stop: AtomicBool,
}

impl SharedSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_drowsy(&self, drowsy: bool) {
        self.drowsy.store(drowsy, Ordering::Release);
    }

    pub fn is_drowsy(&self) -> bool {
        self.drowsy.load(Ordering::Acquire)
    }

    /// Request shutdown. Returns true only for the call that set the flag.
    pub fn request_stop(&self) -> bool {
        !self.stop.swap(true, Ordering::AcqRel)
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}

//! Operator input polled once per frame

use crate::StopReason;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Source of operator stop requests
pub trait OperatorControls {
    /// Called once per frame; `Some` ends the session
    fn poll(&self) -> Option<StopReason>;
}

/// No operator input (headless runs end on end-of-stream only)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoControls;

impl OperatorControls for NoControls {
    fn poll(&self) -> Option<StopReason> {
        None
    }
}

/// Quit flag set from another task (e.g. a Ctrl-C handler)
#[derive(Debug, Default, Clone)]
pub struct QuitFlag(Arc<AtomicBool>);

impl QuitFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl OperatorControls for QuitFlag {
    fn poll(&self) -> Option<StopReason> {
        self.is_set().then_some(StopReason::OperatorQuit)
    }
}

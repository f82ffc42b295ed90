//! Driver drowsiness state tracking

use crate::config::{DmsConfig, NoFacePolicy};
use crate::ear::EarSample;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info};

/// Drowsiness state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrowsyState {
    #[default]
    Normal,
    Drowsy,
}

impl DrowsyState {
    pub fn is_drowsy(self) -> bool {
        self == DrowsyState::Drowsy
    }
}

/// A transition between states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateEdge {
    EnteredDrowsy,
    ExitedDrowsy,
}

/// Thresholds EAR samples into Normal/Drowsy and reports edges.
///
/// With a smoothing window of 1 every sample decides the state on its own:
/// Drowsy iff sample < threshold. Larger windows take a majority vote over
/// the most recent samples; a tie keeps the current state.
#[derive(Debug, Clone)]
pub struct DrowsinessStateMachine {
    threshold: f64,
    window: usize,
    no_face_policy: NoFacePolicy,
    /// true = sample was below threshold
    votes: VecDeque<bool>,
    state: DrowsyState,
}

impl DrowsinessStateMachine {
    pub fn new(config: &DmsConfig) -> Self {
        let window = config.smoothing_window.max(1);
        Self {
            threshold: config.ear_threshold,
            window,
            no_face_policy: config.no_face_policy,
            votes: VecDeque::with_capacity(window),
            state: DrowsyState::Normal,
        }
    }

    /// Raw-threshold machine with default policy
    pub fn with_threshold(threshold: f64) -> Self {
        Self::new(&DmsConfig {
            ear_threshold: threshold,
            ..Default::default()
        })
    }

    pub fn state(&self) -> DrowsyState {
        self.state
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Feed the sample of a detected face; returns the edge it caused, if any.
    ///
    /// Always votes, even when the eyes are shut tight enough to read 0.00.
    pub fn update(&mut self, sample: EarSample) -> Option<StateEdge> {
        self.vote(sample)
    }

    /// Feed a frame where no face was detected
    pub fn update_no_face(&mut self) -> Option<StateEdge> {
        match self.no_face_policy {
            NoFacePolicy::TreatAsClosed => self.vote(EarSample::NO_FACE),
            NoFacePolicy::HoldState => {
                debug!("No face, holding {:?}", self.state);
                None
            }
        }
    }

    fn vote(&mut self, sample: EarSample) -> Option<StateEdge> {
        if self.votes.len() == self.window {
            self.votes.pop_front();
        }
        self.votes.push_back(sample.value() < self.threshold);

        let closed = self.votes.iter().filter(|&&below| below).count();
        let open = self.votes.len() - closed;
        let next = if closed > open {
            DrowsyState::Drowsy
        } else if open > closed {
            DrowsyState::Normal
        } else {
            self.state
        };

        let edge = match (self.state, next) {
            (DrowsyState::Normal, DrowsyState::Drowsy) => Some(StateEdge::EnteredDrowsy),
            (DrowsyState::Drowsy, DrowsyState::Normal) => Some(StateEdge::ExitedDrowsy),
            _ => None,
        };

        if let Some(edge) = edge {
            info!(
                "Driver state {:?} -> {:?} (EAR {:.2}, threshold {:.2})",
                self.state, next, sample.value(), self.threshold
            );
            debug!("Edge: {:?}", edge);
        }

        self.state = next;
        edge
    }

    /// Back to Normal with an empty vote window (on driver change)
    pub fn reset(&mut self) {
        self.votes.clear();
        self.state = DrowsyState::Normal;
    }
}

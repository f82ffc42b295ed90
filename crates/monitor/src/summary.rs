//! End-of-session report

use crate::perception::FrameStats;
use crate::StopReason;
use alerting::AlertStats;
use chrono::{DateTime, Utc};
use haptics::{ActuatorReport, HapticError};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

/// What happened during one session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub stop_reason: StopReason,
    pub frames: FrameStats,
    pub alerts: AlertStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actuator: Option<ActuatorReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actuator_error: Option<String>,
}

impl SessionSummary {
    pub fn new(
        session_id: Uuid,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        stop_reason: StopReason,
        frames: FrameStats,
        alerts: AlertStats,
        actuator: Result<ActuatorReport, HapticError>,
    ) -> Self {
        let (actuator, actuator_error) = match actuator {
            Ok(report) => (Some(report), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            session_id,
            started_at,
            ended_at,
            stop_reason,
            frames,
            alerts,
            actuator,
            actuator_error,
        }
    }

    pub fn duration(&self) -> chrono::Duration {
        self.ended_at - self.started_at
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Log the summary as one JSON line
    pub fn log(&self) {
        match self.to_json() {
            Ok(json) => info!(target: "session_summary", "{}", json),
            Err(e) => warn!("Failed to serialize session summary: {}", e),
        }
    }
}

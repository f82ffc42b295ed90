//! Layered configuration: defaults, optional file, environment

use crate::MonitorError;
use camera_capture::CameraConfig;
use config::{Config, Environment, File};
use dms::DmsConfig;
use haptics::ActuatorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::Level;

/// Environment variable prefix, e.g. `DROWSY__DMS__EAR_THRESHOLD=0.24`
pub const ENV_PREFIX: &str = "DROWSY";

/// Perception loop options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Stop the session when the actuator loop dies; otherwise keep alerting
    /// with audio only
    pub require_actuator: bool,
    /// JSON-lines landmark recording to replay
    pub replay: Option<PathBuf>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            require_actuator: true,
            replay: None,
        }
    }
}

/// Logging options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Max level: trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LoggingConfig {
    pub fn max_level(&self) -> Result<Level, MonitorError> {
        self.level
            .parse()
            .map_err(|_| MonitorError::Config(format!("unknown log level '{}'", self.level)))
    }
}

/// All settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dms: DmsConfig,
    pub actuator: ActuatorConfig,
    pub camera: CameraConfig,
    pub monitor: MonitorConfig,
    pub logging: LoggingConfig,
}

impl Settings {
    /// Load defaults, then `path` (if given), then `DROWSY__*` variables
    pub fn load(path: Option<&Path>) -> Result<Self, MonitorError> {
        Self::load_with_env(path, Self::environment())
    }

    /// Like [`Settings::load`] with an explicit environment source
    pub fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self, MonitorError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Settings = builder.add_source(env).build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
    }

    pub fn validate(&self) -> Result<(), MonitorError> {
        self.dms.validate()?;
        self.actuator.validate()?;
        self.camera.validate()?;
        self.logging.max_level()?;
        Ok(())
    }
}

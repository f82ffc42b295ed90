//! Fixed-rate actuator loop

use crate::guard::NeutralGuard;
use crate::signal::SharedSignal;
use crate::{HapticDriver, HapticError, Intensity};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error, info};

/// Actuator loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActuatorConfig {
    /// Time between two ticks (milliseconds)
    pub tick_interval_ms: u64,
    /// Intensity commanded while drowsy (percent)
    pub drive_intensity: u8,
    /// Effect channel on the device
    pub channel: u8,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            drive_intensity: 50,
            channel: 0,
        }
    }
}

impl ActuatorConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> Result<Intensity, HapticError> {
        if self.tick_interval_ms == 0 {
            return Err(HapticError::Config("tick_interval_ms must be at least 1".into()));
        }
        Intensity::new(self.drive_intensity)
    }
}

/// What the loop did before it exited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActuatorReport {
    /// Ticks executed
    pub ticks: u64,
    /// Ticks that commanded the drive intensity
    pub drive_ticks: u64,
    /// Last intensity commanded by a tick (the guard sends neutral after it)
    pub last_intensity: Intensity,
}

/// Reads the drowsy flag once per tick and commands the device.
pub struct ActuatorLoop<D: HapticDriver> {
    guard: NeutralGuard<D>,
    signal: Arc<SharedSignal>,
    interval: Duration,
    drive: Intensity,
    report: ActuatorReport,
}

impl<D: HapticDriver> ActuatorLoop<D> {
    /// Validate the config and initialize the device (no retry)
    pub fn new(
        driver: D,
        signal: Arc<SharedSignal>,
        config: &ActuatorConfig,
    ) -> Result<Self, HapticError> {
        let drive = config.validate()?;
        let guard = NeutralGuard::initialize(driver, config.channel)?;
        Ok(Self {
            guard,
            signal,
            interval: config.tick_interval(),
            drive,
            report: ActuatorReport::default(),
        })
    }

    /// One tick: read the flag, command the device, flush
    pub fn step(&mut self) -> Result<Intensity, HapticError> {
        let intensity = if self.signal.is_drowsy() {
            self.drive
        } else {
            Intensity::NEUTRAL
        };

        self.guard.command(intensity)?;

        self.report.ticks += 1;
        if intensity == self.drive && !intensity.is_neutral() {
            self.report.drive_ticks += 1;
        }
        self.report.last_intensity = intensity;
        metrics::counter!("actuator_ticks_total").increment(1);
        Ok(intensity)
    }

    /// Tick until stop is requested. The device is neutralized and released
    /// when `self` drops, on every return path.
    pub fn run(mut self) -> Result<ActuatorReport, HapticError> {
        info!("Actuator loop started ({:?} tick, drive {})", self.interval, self.drive.value());

        while !self.signal.stop_requested() {
            if let Err(e) = self.step() {
                error!("Actuator tick {} failed: {}", self.report.ticks + 1, e);
                return Err(e);
            }
            std::thread::sleep(self.interval);
        }

        info!(
            "Actuator loop stopping after {} ticks ({} driving)",
            self.report.ticks, self.report.drive_ticks
        );
        Ok(self.report)
    }

    /// Move the driver onto a dedicated thread and run the loop there.
    ///
    /// Initialization happens on that thread too; its failure is returned
    /// from [`ActuatorHandle::join`].
    pub fn spawn(
        driver: D,
        signal: Arc<SharedSignal>,
        config: ActuatorConfig,
    ) -> Result<ActuatorHandle, HapticError>
    where
        D: 'static,
    {
        let handle = std::thread::Builder::new()
            .name("actuator".into())
            .spawn(move || {
                let actuator = match ActuatorLoop::new(driver, signal, &config) {
                    Ok(a) => a,
                    Err(e) => {
                        error!("Actuator unavailable: {}", e);
                        return Err(e);
                    }
                };
                actuator.run()
            })
            .map_err(|e| HapticError::Spawn(e.to_string()))?;

        debug!("Actuator thread spawned");
        Ok(ActuatorHandle { handle })
    }
}

/// Join handle of a spawned actuator loop
pub struct ActuatorHandle {
    handle: JoinHandle<Result<ActuatorReport, HapticError>>,
}

impl ActuatorHandle {
    /// Whether the thread has exited
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the thread to exit
    pub fn join(self) -> Result<ActuatorReport, HapticError> {
        self.handle.join().map_err(|_| HapticError::Panicked)?
    }
}

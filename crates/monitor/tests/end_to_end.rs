use alerting::mock::{AudioCall, RecordingAudio};
use alerting::{AlertCoordinator, AudioAlertDevice, AudioError};
use camera_capture::mock::{ScriptedCamera, ScriptedFrame};
use camera_capture::{CameraError, FrameSource, VideoFrame};
use dms::mock::{ScriptedDetection, ScriptedLandmarks};
use dms::{DmsConfig, DmsModule, DrowsyState, ReplayLandmarks};
use haptics::mock::RecordingHaptics;
use haptics::{ActuatorConfig, ActuatorLoop, HapticDriver, HapticError, Intensity, SharedSignal};
use monitor::{run, Devices, NoControls, OperatorControls, Settings, StopReason};
use parking_lot::Mutex;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

fn fast_settings() -> Settings {
    let mut settings = Settings::default();
    settings.actuator.tick_interval_ms = 2;
    settings
}

/// Shared log of teardown events across several fake devices
#[derive(Clone, Default)]
struct Timeline(Arc<Mutex<Vec<&'static str>>>);

impl Timeline {
    fn push(&self, event: &'static str) {
        self.0.lock().push(event);
    }

    fn position(&self, event: &str) -> usize {
        self.0
            .lock()
            .iter()
            .position(|e| *e == event)
            .unwrap_or_else(|| panic!("event {event} missing"))
    }
}

struct TimelineCamera {
    inner: ScriptedCamera,
    timeline: Timeline,
}

impl FrameSource for TimelineCamera {
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError> {
        self.inner.next_frame()
    }
}

impl Drop for TimelineCamera {
    fn drop(&mut self) {
        self.timeline.push("video released");
    }
}

struct TimelineAudio {
    timeline: Timeline,
}

impl AudioAlertDevice for TimelineAudio {
    fn play_looped(&mut self) -> Result<(), AudioError> {
        self.timeline.push("audio play");
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.timeline.push("audio stop");
        Ok(())
    }
}

impl Drop for TimelineAudio {
    fn drop(&mut self) {
        self.timeline.push("audio released");
    }
}

struct TimelineHaptics {
    timeline: Timeline,
}

impl HapticDriver for TimelineHaptics {
    fn initialize(&mut self) -> Result<(), HapticError> {
        Ok(())
    }

    fn set_effect(&mut self, _channel: u8, _intensity: Intensity) -> Result<(), HapticError> {
        Ok(())
    }

    fn flush(&mut self) -> Result<(), HapticError> {
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), HapticError> {
        self.timeline.push("haptics shutdown");
        Ok(())
    }
}

/// Audio device whose playback panics
struct PanickingAudio {
    timeline: Timeline,
}

impl AudioAlertDevice for PanickingAudio {
    fn play_looped(&mut self) -> Result<(), AudioError> {
        panic!("audio driver crashed");
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
}

impl Drop for PanickingAudio {
    fn drop(&mut self) {
        self.timeline.push("audio released");
    }
}

/// Camera that paces frames so the actuator thread gets scheduled
struct PacedCamera {
    sequence: u32,
    limit: u32,
}

impl FrameSource for PacedCamera {
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError> {
        if self.sequence >= self.limit {
            return Err(CameraError::EndOfStream(self.sequence));
        }
        std::thread::sleep(Duration::from_millis(2));
        let frame = VideoFrame::blank(4, 4, 0, self.sequence)?;
        self.sequence += 1;
        Ok(frame)
    }
}

/// Quits after a fixed number of polls
struct QuitAfter {
    remaining: Cell<u32>,
    reason: StopReason,
}

impl OperatorControls for QuitAfter {
    fn poll(&self) -> Option<StopReason> {
        let left = self.remaining.get();
        if left == 0 {
            return Some(self.reason);
        }
        self.remaining.set(left - 1);
        None
    }
}

#[test]
fn ear_sequence_drives_alert_and_actuator_in_lockstep() {
    let ears = [0.30, 0.28, 0.20, 0.20, 0.27];
    let audio = RecordingAudio::new();
    let haptics = RecordingHaptics::new();
    let signal = Arc::new(SharedSignal::new());

    let source = ScriptedLandmarks::from_ears(&ears);
    let mut dms = DmsModule::new(&DmsConfig::default(), source).unwrap();
    let mut alerts = AlertCoordinator::new(audio.clone());
    let config = ActuatorConfig::default();
    let mut actuator = ActuatorLoop::new(haptics.clone(), Arc::clone(&signal), &config).unwrap();
    let mut camera = ScriptedCamera::frames(ears.len());

    let mut states = Vec::new();
    for index in 0..ears.len() {
        let frame = camera.next_frame().unwrap();
        let analysis = dms.analyze(&frame).unwrap();
        signal.set_drowsy(analysis.is_drowsy());
        if let Some(edge) = analysis.edge {
            alerts.on_edge(edge);
        }
        actuator.step().unwrap();

        states.push(analysis.state);
        match index {
            2 => assert_eq!(audio.calls(), vec![AudioCall::Play]),
            4 => assert_eq!(audio.calls(), vec![AudioCall::Play, AudioCall::Stop]),
            _ => {}
        }
    }

    use DrowsyState::{Drowsy, Normal};
    assert_eq!(states, vec![Normal, Normal, Drowsy, Drowsy, Normal]);
    assert_eq!(audio.count(AudioCall::Play), 1);
    assert_eq!(audio.count(AudioCall::Stop), 1);
    assert_eq!(haptics.intensities(), vec![0, 0, 50, 50, 0]);

    drop(actuator);
    assert_eq!(haptics.last_intensity(), Some(0));
    assert!(haptics.is_shut_down());
}

#[test]
fn session_runs_to_end_of_stream() {
    let ears = [0.30, 0.28, 0.20, 0.20, 0.27];
    let audio = RecordingAudio::new();
    let haptics = RecordingHaptics::new();
    let devices = Devices {
        camera: ScriptedCamera::frames(ears.len()),
        landmarks: ScriptedLandmarks::from_ears(&ears),
        audio: audio.clone(),
        haptics: haptics.clone(),
    };

    let summary = run(&fast_settings(), devices, &NoControls).unwrap();

    assert_eq!(summary.stop_reason, StopReason::EndOfStream);
    assert_eq!(summary.frames.frames, 5);
    assert_eq!(summary.frames.drowsy_frames, 2);
    assert_eq!(summary.frames.drowsy_episodes, 1);
    assert_eq!(summary.alerts.starts, 1);
    assert_eq!(summary.alerts.stops, 1);
    assert!(summary.actuator.is_some());
    assert!(summary.actuator_error.is_none());

    assert_eq!(audio.calls(), vec![AudioCall::Play, AudioCall::Stop]);
    assert_eq!(haptics.last_intensity(), Some(0));
    assert!(haptics.is_shut_down());
}

#[test]
fn session_ending_drowsy_silences_alert() {
    let audio = RecordingAudio::new();
    let haptics = RecordingHaptics::new();
    let devices = Devices {
        camera: ScriptedCamera::frames(3),
        landmarks: ScriptedLandmarks::from_ears(&[0.30, 0.20, 0.20]),
        audio: audio.clone(),
        haptics: haptics.clone(),
    };

    let summary = run(&fast_settings(), devices, &NoControls).unwrap();

    assert_eq!(summary.alerts.starts, 1);
    assert_eq!(audio.calls(), vec![AudioCall::Play, AudioCall::Stop]);
    assert_eq!(haptics.last_intensity(), Some(0));
}

#[test]
fn teardown_order_is_actuator_audio_video() {
    let timeline = Timeline::default();
    let devices = Devices {
        camera: TimelineCamera {
            inner: ScriptedCamera::new([
                ScriptedFrame::Frame,
                ScriptedFrame::Frame,
                ScriptedFrame::Fail("usb reset".into()),
            ]),
            timeline: timeline.clone(),
        },
        landmarks: ScriptedLandmarks::from_ears(&[0.20, 0.20, 0.20]),
        audio: TimelineAudio { timeline: timeline.clone() },
        haptics: TimelineHaptics { timeline: timeline.clone() },
    };

    let summary = run(&fast_settings(), devices, &NoControls).unwrap();

    assert_eq!(summary.stop_reason, StopReason::FrameSourceFailed);
    let haptics_down = timeline.position("haptics shutdown");
    let audio_stop = timeline.position("audio stop");
    let audio_released = timeline.position("audio released");
    let video_released = timeline.position("video released");
    assert!(haptics_down < audio_stop);
    assert!(audio_stop < audio_released);
    assert!(audio_released < video_released);
}

#[test]
fn panicking_device_still_joins_actuator_before_release() {
    let timeline = Timeline::default();
    let devices = Devices {
        camera: TimelineCamera {
            inner: ScriptedCamera::frames(3),
            timeline: timeline.clone(),
        },
        landmarks: ScriptedLandmarks::from_ears(&[0.30, 0.20, 0.20]),
        audio: PanickingAudio { timeline: timeline.clone() },
        haptics: TimelineHaptics { timeline: timeline.clone() },
    };
    let settings = fast_settings();

    let result = panic::catch_unwind(AssertUnwindSafe(|| run(&settings, devices, &NoControls)));

    assert!(result.is_err());
    let haptics_down = timeline.position("haptics shutdown");
    let audio_released = timeline.position("audio released");
    let video_released = timeline.position("video released");
    assert!(haptics_down < audio_released);
    assert!(haptics_down < video_released);
}

#[test]
fn operator_quit_stops_session() {
    let haptics = RecordingHaptics::new();
    let devices = Devices {
        camera: ScriptedCamera::frames(100),
        landmarks: ScriptedLandmarks::from_ears(&[0.30; 100]),
        audio: RecordingAudio::new(),
        haptics: haptics.clone(),
    };
    let controls = QuitAfter {
        remaining: Cell::new(3),
        reason: StopReason::OperatorQuit,
    };

    let summary = run(&fast_settings(), devices, &controls).unwrap();

    assert_eq!(summary.stop_reason, StopReason::OperatorQuit);
    assert_eq!(summary.frames.frames, 4);
    assert!(haptics.is_shut_down());
}

#[test]
fn window_close_is_reported() {
    let devices = Devices {
        camera: ScriptedCamera::frames(10),
        landmarks: ScriptedLandmarks::from_ears(&[0.30; 10]),
        audio: RecordingAudio::new(),
        haptics: RecordingHaptics::new(),
    };
    let controls = QuitAfter {
        remaining: Cell::new(0),
        reason: StopReason::WindowClosed,
    };

    let summary = run(&fast_settings(), devices, &controls).unwrap();
    assert_eq!(summary.stop_reason, StopReason::WindowClosed);
    assert_eq!(summary.frames.frames, 1);
}

#[test]
fn actuator_init_failure_stops_required_session() {
    let haptics = RecordingHaptics::new();
    haptics.fail_init();
    let devices = Devices {
        camera: PacedCamera { sequence: 0, limit: 5_000 },
        landmarks: ScriptedLandmarks::from_ears(&[0.30; 5_000]),
        audio: RecordingAudio::new(),
        haptics: haptics.clone(),
    };

    let summary = run(&fast_settings(), devices, &NoControls).unwrap();

    assert_eq!(summary.stop_reason, StopReason::ActuatorFailed);
    assert!(summary.frames.frames < 5_000);
    assert!(summary.actuator.is_none());
    assert!(summary.actuator_error.unwrap().contains("initialization"));
    assert_eq!(haptics.last_intensity(), Some(0));
}

#[test]
fn actuator_failure_degrades_to_audio_only() {
    let haptics = RecordingHaptics::new();
    haptics.fail_init();
    let audio = RecordingAudio::new();
    let mut ears = vec![0.30; 40];
    ears.extend([0.20; 10]);
    let devices = Devices {
        camera: PacedCamera { sequence: 0, limit: 50 },
        landmarks: ScriptedLandmarks::from_ears(&ears),
        audio: audio.clone(),
        haptics,
    };
    let mut settings = fast_settings();
    settings.monitor.require_actuator = false;

    let summary = run(&settings, devices, &NoControls).unwrap();

    assert_eq!(summary.stop_reason, StopReason::EndOfStream);
    assert_eq!(summary.frames.frames, 50);
    assert!(summary.actuator_error.is_some());
    assert_eq!(audio.calls(), vec![AudioCall::Play, AudioCall::Stop]);
}

#[test]
fn bad_frames_are_skipped_not_fatal() {
    let landmarks = ScriptedLandmarks::new([
        ScriptedDetection::Ear(0.30),
        ScriptedDetection::Fail("occluded".into()),
        ScriptedDetection::NoFace,
        ScriptedDetection::Ear(0.30),
    ]);
    let devices = Devices {
        camera: ScriptedCamera::frames(4),
        landmarks,
        audio: RecordingAudio::new(),
        haptics: RecordingHaptics::new(),
    };

    let summary = run(&fast_settings(), devices, &NoControls).unwrap();

    assert_eq!(summary.stop_reason, StopReason::EndOfStream);
    assert_eq!(summary.frames.frames, 3);
    assert_eq!(summary.frames.skipped_frames, 1);
    assert_eq!(summary.frames.no_face_frames, 1);
    // the no-face frame is treated as closed eyes
    assert_eq!(summary.alerts.starts, 1);
    assert_eq!(summary.alerts.stops, 1);
}

#[test]
fn replayed_recording_matches_scripted_run() {
    let lines: Vec<String> = [0.30, 0.20, 0.20, 0.30]
        .iter()
        .map(|&ear| serde_json::to_string(&dms::mock::synthetic_face(ear)).unwrap())
        .chain(std::iter::once("null".to_string()))
        .collect();
    let landmarks = ReplayLandmarks::from_reader(lines.join("\n").as_bytes()).unwrap();
    assert_eq!(landmarks.len(), 5);

    let devices = Devices {
        camera: ScriptedCamera::frames(100),
        landmarks,
        audio: RecordingAudio::new(),
        haptics: RecordingHaptics::new(),
    };

    let summary = run(&fast_settings(), devices, &NoControls).unwrap();

    assert_eq!(summary.stop_reason, StopReason::EndOfStream);
    assert_eq!(summary.frames.frames, 5);
    assert_eq!(summary.frames.drowsy_episodes, 2);
    assert_eq!(summary.alerts.starts, 2);
    assert_eq!(summary.alerts.stops, 2);
}

#[test]
fn invalid_settings_rejected_before_devices_start() {
    let haptics = RecordingHaptics::new();
    let mut settings = fast_settings();
    settings.dms.ear_threshold = 1.5;
    let devices = Devices {
        camera: ScriptedCamera::frames(1),
        landmarks: ScriptedLandmarks::from_ears(&[0.30]),
        audio: RecordingAudio::new(),
        haptics: haptics.clone(),
    };

    assert!(run(&settings, devices, &NoControls).is_err());
    assert!(haptics.calls().is_empty());
}

//! End-to-end Integration Test Suite
//!
//! Drives a complete performer the way an application would:
//! - Four simulated devices stream over their own links
//! - Receive tasks push frames through bounded feeds
//! - A render loop drains the feeds and samples every stream
//! - Every sampled frame is checked for well-formedness

use std::sync::Arc;

use kinesync_core::KinesyncResult;
use kinesync_motion::{
    BlendShape, BodyFrame, EyeFrame, FaceFrame, FingerBone, FingerFrame, HumanBone, Quat, Vec3,
    FINGER_BONE_COUNT,
};
use kinesync_runtime::{
    channel, FrameReceiver, FrameSender, MotionKind, Performer, PerformerFrame, RuntimeConfig,
    SourceRegistry,
};
use kinesync_time::{ManualClock, TimedBufferConfig};

use crate::stream_simulator::{ClockDriftModel, LinkConfig, SimulatedStream};

// ============================================================================
// SYNTHETIC MOTION
// ============================================================================

/// Body swaying on a unit circle, head turning
pub fn body_at(source_time: f64) -> BodyFrame {
    let s = source_time as f32;
    let mut frame = BodyFrame::rest();
    frame.root_position = Vec3::new(s.sin(), 0.0, s.cos());
    frame.set_rotation(HumanBone::Head, Quat::from_euler(0.5 * s.sin(), 0.0, 0.0));
    frame
}

/// Both hands curling and opening
pub fn finger_at(source_time: f64) -> FingerFrame {
    let curl = 0.75 + 0.75 * (source_time as f32).sin();
    let mut frame = FingerFrame::open();
    for index in 0..FINGER_BONE_COUNT {
        if let Some(bone) = FingerBone::from_index(index) {
            frame.set_rotation(bone, Quat::from_axis_angle(Vec3::new(1.0, 0.0, 0.0), curl));
        }
    }
    frame
}

/// Jaw and smile; the smile channel is only sent on alternate seconds
pub fn face_at(source_time: f64) -> FaceFrame {
    let s = source_time as f32;
    let mut frame = FaceFrame::empty();
    frame.set(BlendShape::JawOpen, 0.5 + 0.5 * s.sin());
    if (source_time as i64) % 2 == 0 {
        frame.set(BlendShape::MouthSmileLeft, 0.5 + 0.5 * s.cos());
    }
    frame
}

/// Gaze wandering
pub fn eye_at(source_time: f64) -> EyeFrame {
    let s = source_time as f32;
    EyeFrame::from_gaze(0.3 * s.sin(), 0.1 * s.cos())
}

// ============================================================================
// SIMULATED DEVICE
// ============================================================================

/// One device: a simulated stream feeding a frame channel
struct Device<T> {
    stream: SimulatedStream,
    tx: FrameSender<T>,
    rx: FrameReceiver<T>,
    make: fn(f64) -> T,
}

impl<T> Device<T> {
    fn new(stream: SimulatedStream, feed_capacity: usize, make: fn(f64) -> T) -> Self {
        let (tx, rx) = channel(feed_capacity);
        Device { stream, tx, rx, make }
    }

    /// Push everything that arrived by `now`; returns (sent, rejected)
    fn pump(&mut self, now: f64) -> (usize, usize) {
        let mut sent = 0;
        let mut rejected = 0;
        for delivery in self.stream.deliveries_until(now) {
            let value = (self.make)(delivery.source_time);
            match self.tx.send(delivery.local_time, delivery.source_time, value) {
                Ok(()) => sent += 1,
                Err(_) => rejected += 1,
            }
        }
        (sent, rejected)
    }
}

// ============================================================================
// INTEGRATION TEST HARNESS
// ============================================================================

/// Configuration for integration tests
#[derive(Debug, Clone)]
pub struct IntegrationTestConfig {
    /// Receiver time simulated (seconds)
    pub duration: f64,
    /// Render loop rate
    pub render_hz: f64,
    /// Link shared by every device
    pub link: LinkConfig,
    pub runtime: RuntimeConfig,
    pub seed: u64,
}

impl Default for IntegrationTestConfig {
    fn default() -> Self {
        Self {
            duration: 10.0,
            render_hz: 90.0,
            link: LinkConfig::default(),
            runtime: RuntimeConfig::default(),
            seed: 0,
        }
    }
}

impl IntegrationTestConfig {
    /// Minimal test configuration
    pub fn minimal() -> Self {
        Self {
            duration: 2.0,
            link: LinkConfig::perfect(),
            ..Self::default()
        }
    }

    /// Standard test configuration
    pub fn standard() -> Self {
        Self::default()
    }

    /// Stress test configuration
    pub fn stress() -> Self {
        let mut runtime = RuntimeConfig::default();
        for config in [&mut runtime.body, &mut runtime.finger, &mut runtime.face, &mut runtime.eye] {
            *config = TimedBufferConfig::high_jitter();
        }
        Self {
            duration: 30.0,
            link: LinkConfig::hostile(),
            runtime,
            ..Self::default()
        }
    }

    pub fn with_link(mut self, link: LinkConfig) -> Self {
        self.link = link;
        self
    }
}

/// Per-stream tallies
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamTally {
    pub hits: u64,
    pub misses: u64,
    pub frames_sent: usize,
    pub frames_rejected: usize,
}

impl StreamTally {
    fn record(&mut self, hit: bool) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}

/// Result of an integration test
#[derive(Debug, Clone)]
pub struct IntegrationTestResult {
    pub ticks: u64,
    pub body: StreamTally,
    pub finger: StreamTally,
    pub face: StreamTally,
    pub eye: StreamTally,
    /// Malformed frames observed
    pub violations: Vec<String>,
}

impl IntegrationTestResult {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn tally(&self, kind: MotionKind) -> &StreamTally {
        match kind {
            MotionKind::Body => &self.body,
            MotionKind::Finger => &self.finger,
            MotionKind::Face => &self.face,
            MotionKind::Eye => &self.eye,
        }
    }

    /// Worst hit rate across streams
    pub fn min_hit_rate(&self) -> f64 {
        MotionKind::all()
            .iter()
            .map(|kind| self.tally(*kind).hit_rate())
            .fold(f64::MAX, f64::min)
    }
}

/// Integration test harness
pub struct IntegrationTestHarness {
    config: IntegrationTestConfig,
    clock: Arc<ManualClock>,
    performer: Performer,
    body: Device<BodyFrame>,
    finger: Device<FingerFrame>,
    face: Device<FaceFrame>,
    eye: Device<EyeFrame>,
}

impl IntegrationTestHarness {
    /// Create a new test harness
    pub fn new(config: IntegrationTestConfig, registry: &SourceRegistry) -> KinesyncResult<Self> {
        let clock = Arc::new(ManualClock::new(0.0));
        let performer = Performer::new(registry, "performer", &config.runtime, clock.clone())?;

        let capacity = config.runtime.feed_capacity;
        let stream = |rate_hz: f64, epoch: f64, seed: u64| {
            SimulatedStream::new(
                rate_hz,
                ClockDriftModel::new(epoch, 1.0),
                config.link.clone(),
                config.seed.wrapping_mul(4).wrapping_add(seed),
            )
        };

        let body = Device::new(stream(60.0, 100.0, 0), capacity, body_at);
        let finger = Device::new(stream(60.0, 5_000.0, 1), capacity, finger_at);
        let face = Device::new(stream(60.0, 42.0, 2), capacity, face_at);
        let eye = Device::new(stream(120.0, 42.0, 3), capacity, eye_at);

        Ok(Self {
            config,
            clock,
            performer,
            body,
            finger,
            face,
            eye,
        })
    }

    /// Run the integration test
    pub fn run(&mut self) -> IntegrationTestResult {
        let interval = 1.0 / self.config.render_hz;
        let ticks = (self.config.duration * self.config.render_hz).round() as u64;

        let mut result = IntegrationTestResult {
            ticks,
            body: StreamTally::default(),
            finger: StreamTally::default(),
            face: StreamTally::default(),
            eye: StreamTally::default(),
            violations: Vec::new(),
        };

        for _ in 0..ticks {
            let now = self.clock.advance(interval);
            self.pump(now, &mut result);

            let frame = self.performer.sample_all();
            result.body.record(frame.body.is_some());
            result.finger.record(frame.finger.is_some());
            result.face.record(frame.face.is_some());
            result.eye.record(frame.eye.is_some());
            Self::check_frame(&frame, &mut result.violations);
        }

        result
    }

    /// Move arrived frames through the feeds into the performer
    fn pump(&mut self, now: f64, result: &mut IntegrationTestResult) {
        let tallies = [
            (self.body.pump(now), &mut result.body),
            (self.finger.pump(now), &mut result.finger),
            (self.face.pump(now), &mut result.face),
            (self.eye.pump(now), &mut result.eye),
        ];
        for ((sent, rejected), tally) in tallies {
            tally.frames_sent += sent;
            tally.frames_rejected += rejected;
        }

        self.body.rx.drain_into_source(&self.performer.body);
        self.finger.rx.drain_into_source(&self.performer.finger);
        self.face.rx.drain_into_source(&self.performer.face);
        self.eye.rx.drain_into_source(&self.performer.eye);
    }

    /// Check that a sampled frame is well-formed
    fn check_frame(frame: &PerformerFrame, violations: &mut Vec<String>) {
        let t = frame.local_time;
        let unit = |q: &Quat| (q.length() - 1.0).abs() < 1e-3;

        if let Some(body) = &frame.body {
            if body.root_position.length() > 1.0 + 1e-4 {
                violations.push(format!("t={t:.3}: root left the unit circle"));
            }
            if !unit(&body.bone(HumanBone::Head).rotation) {
                violations.push(format!("t={t:.3}: head rotation not unit length"));
            }
        }
        if let Some(finger) = &frame.finger {
            if !finger.rotations.iter().all(unit) {
                violations.push(format!("t={t:.3}: finger rotation not unit length"));
            }
        }
        if let Some(face) = &frame.face {
            if face.get(BlendShape::JawOpen).is_none() {
                violations.push(format!("t={t:.3}: jaw channel missing"));
            }
            if face.present().any(|(_, w)| !(-1e-4..=1.0 + 1e-4).contains(&w)) {
                violations.push(format!("t={t:.3}: blend shape weight out of range"));
            }
        }
        if let Some(eye) = &frame.eye {
            if !unit(&eye.left) || !unit(&eye.right) {
                violations.push(format!("t={t:.3}: eye rotation not unit length"));
            }
        }
    }

    pub fn performer(&self) -> &Performer {
        &self.performer
    }
}

// ============================================================================
// PREDEFINED RUNS
// ============================================================================

fn run_with(config: IntegrationTestConfig) -> IntegrationTestResult {
    let registry = SourceRegistry::new();
    match IntegrationTestHarness::new(config, &registry) {
        Ok(mut harness) => harness.run(),
        Err(e) => IntegrationTestResult {
            ticks: 0,
            body: StreamTally::default(),
            finger: StreamTally::default(),
            face: StreamTally::default(),
            eye: StreamTally::default(),
            violations: vec![format!("harness setup failed: {e}")],
        },
    }
}

/// Clean links, default buffers
pub fn test_basic_playback() -> IntegrationTestResult {
    run_with(IntegrationTestConfig::minimal())
}

/// Wi-Fi links
pub fn test_playback_over_wifi() -> IntegrationTestResult {
    run_with(IntegrationTestConfig::standard().with_link(LinkConfig::wifi()))
}

/// Hostile links, long buffers
pub fn test_playback_under_stress() -> IntegrationTestResult {
    run_with(IntegrationTestConfig::stress())
}

//! Performer - the four motion streams of one tracked person
//!
//! Body, finger, face and eye data typically come from different devices
//! with unrelated clocks. Each stream keeps its own buffer and delay
//! estimate; the performer samples all of them at one local instant.

use std::sync::Arc;

use kinesync_core::KinesyncResult;
use kinesync_motion::{
    BodyFrame, BodyInterpolator, EyeFrame, EyeInterpolator, FaceFrame, FaceInterpolator,
    FingerFrame, FingerInterpolator,
};
use kinesync_time::{Clock, DelayMode};

use crate::{MotionKind, MotionSource, RuntimeConfig, SourceRegistry};

pub type BodySource = MotionSource<BodyFrame, BodyInterpolator>;
pub type FingerSource = MotionSource<FingerFrame, FingerInterpolator>;
pub type FaceSource = MotionSource<FaceFrame, FaceInterpolator>;
pub type EyeSource = MotionSource<EyeFrame, EyeInterpolator>;

/// One sampled instant; a stream without bracketing data is `None`
#[derive(Debug, Clone, PartialEq)]
pub struct PerformerFrame {
    pub local_time: f64,
    pub body: Option<BodyFrame>,
    pub finger: Option<FingerFrame>,
    pub face: Option<FaceFrame>,
    pub eye: Option<EyeFrame>,
}

impl PerformerFrame {
    /// Whether no stream produced anything
    pub fn is_empty(&self) -> bool {
        self.body.is_none() && self.finger.is_none() && self.face.is_none() && self.eye.is_none()
    }
}

pub struct Performer {
    name: String,
    clock: Arc<dyn Clock>,
    pub body: BodySource,
    pub finger: FingerSource,
    pub face: FaceSource,
    pub eye: EyeSource,
}

impl Performer {
    /// Register the performer's four sources as `<name>/<kind>`
    pub fn new(
        registry: &SourceRegistry,
        name: impl Into<String>,
        config: &RuntimeConfig,
        clock: Arc<dyn Clock>,
    ) -> KinesyncResult<Self> {
        config.validate()?;
        let name = name.into();
        let source_name = |kind: MotionKind| format!("{}/{}", name, kind.name());

        let body = MotionSource::register(
            registry,
            source_name(MotionKind::Body),
            MotionKind::Body,
            Arc::clone(&clock),
            BodyInterpolator::new(),
            &config.body,
        )?;
        let finger = MotionSource::register(
            registry,
            source_name(MotionKind::Finger),
            MotionKind::Finger,
            Arc::clone(&clock),
            FingerInterpolator::new(),
            &config.finger,
        )?;
        let face = MotionSource::register(
            registry,
            source_name(MotionKind::Face),
            MotionKind::Face,
            Arc::clone(&clock),
            FaceInterpolator::new(),
            &config.face,
        )?;
        let eye = MotionSource::register(
            registry,
            source_name(MotionKind::Eye),
            MotionKind::Eye,
            Arc::clone(&clock),
            EyeInterpolator::new(),
            &config.eye,
        )?;

        tracing::info!(performer = %name, "performer registered");

        Ok(Performer {
            name,
            clock,
            body,
            finger,
            face,
            eye,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sample every stream at the current local time
    pub fn sample_all(&self) -> PerformerFrame {
        self.sample_all_at(self.clock.now())
    }

    pub fn sample_all_at(&self, local_time: f64) -> PerformerFrame {
        PerformerFrame {
            local_time,
            body: self.body.sample_at(local_time),
            finger: self.finger.sample_at(local_time),
            face: self.face.sample_at(local_time),
            eye: self.eye.sample_at(local_time),
        }
    }

    pub fn set_delay_mode(&self, mode: DelayMode) {
        self.body.set_delay_mode(mode);
        self.finger.set_delay_mode(mode);
        self.face.set_delay_mode(mode);
        self.eye.set_delay_mode(mode);
    }

    pub fn reset(&self) {
        self.body.reset();
        self.finger.reset();
        self.face.reset();
        self.eye.reset();
    }
}

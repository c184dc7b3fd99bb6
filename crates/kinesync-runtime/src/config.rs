//! Runtime configuration

use serde::{Deserialize, Serialize};

use kinesync_core::{KinesyncError, KinesyncResult};
use kinesync_time::TimedBufferConfig;

use crate::MotionKind;

/// Largest number of pending frames a feed may be configured with
pub const MAX_FEED_CAPACITY: usize = 1 << 16;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax); `RUST_LOG` wins when set
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "info".into(),
            json: false,
        }
    }
}

/// Runtime configuration: one buffer config per motion kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub body: TimedBufferConfig,
    pub finger: TimedBufferConfig,
    pub face: TimedBufferConfig,
    pub eye: TimedBufferConfig,
    /// Pending frames a feed holds before `send` fails
    pub feed_capacity: usize,
    pub logging: LoggingConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            body: TimedBufferConfig::default(),
            finger: TimedBufferConfig::default(),
            face: TimedBufferConfig::default(),
            eye: TimedBufferConfig::default(),
            feed_capacity: 256,
            logging: LoggingConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Parse and validate a JSON configuration; missing fields take defaults
    pub fn from_json_str(json: &str) -> KinesyncResult<Self> {
        let config: RuntimeConfig =
            serde_json::from_str(json).map_err(|e| KinesyncError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> KinesyncResult<()> {
        for kind in MotionKind::all() {
            self.buffer(*kind).validate().map_err(|e| match e {
                KinesyncError::InvalidConfig(msg) => {
                    KinesyncError::InvalidConfig(format!("{}: {}", kind.name(), msg))
                }
                other => other,
            })?;
        }
        if self.feed_capacity == 0 {
            return Err(KinesyncError::InvalidConfig(
                "feed_capacity must be at least 1".into(),
            ));
        }
        if self.feed_capacity > MAX_FEED_CAPACITY {
            return Err(KinesyncError::InvalidConfig(format!(
                "feed_capacity must be at most {MAX_FEED_CAPACITY}, got {}",
                self.feed_capacity
            )));
        }
        Ok(())
    }

    /// Buffer configuration for a motion kind
    pub fn buffer(&self, kind: MotionKind) -> &TimedBufferConfig {
        match kind {
            MotionKind::Body => &self.body,
            MotionKind::Finger => &self.finger,
            MotionKind::Face => &self.face,
            MotionKind::Eye => &self.eye,
        }
    }
}

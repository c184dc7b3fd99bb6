//! Buffer configuration

use serde::{Deserialize, Serialize};

use kinesync_core::{KinesyncError, KinesyncResult};

/// Largest sample history a buffer may be configured with
pub const MAX_BUFFER_CAPACITY: usize = 1 << 16;

/// How far the query timeline is shifted back before interpolating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelayMode {
    /// Query exactly at the projected source time
    None,
    /// Use the running delay estimate
    #[default]
    Auto,
    /// Use a fixed, configured delay
    Constant,
}

/// Timed buffer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimedBufferConfig {
    /// Samples retained (rounded up to a power of two)
    pub capacity: usize,
    /// Local-time gap (seconds) treated as a stream restart
    pub max_delta_time: f64,
    /// Delay policy
    pub delay_mode: DelayMode,
    /// Delay (seconds) used when `delay_mode` is `Constant`
    pub constant_delay: f64,
}

impl Default for TimedBufferConfig {
    fn default() -> Self {
        TimedBufferConfig {
            capacity: 32,
            max_delta_time: 0.5,
            delay_mode: DelayMode::Auto,
            constant_delay: 0.0,
        }
    }
}

impl TimedBufferConfig {
    /// Short history for local, low-jitter sources
    pub fn low_latency() -> Self {
        TimedBufferConfig {
            capacity: 8,
            max_delta_time: 0.25,
            delay_mode: DelayMode::Auto,
            constant_delay: 0.0,
        }
    }

    /// Long history and a tolerant restart threshold for Wi-Fi sources
    pub fn high_jitter() -> Self {
        TimedBufferConfig {
            capacity: 64,
            max_delta_time: 1.0,
            delay_mode: DelayMode::Auto,
            constant_delay: 0.0,
        }
    }

    /// Fixed-delay configuration
    pub fn constant(delay: f64) -> Self {
        TimedBufferConfig {
            delay_mode: DelayMode::Constant,
            constant_delay: delay,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> KinesyncResult<()> {
        if self.capacity == 0 {
            return Err(KinesyncError::InvalidConfig(
                "capacity must be at least 1".into(),
            ));
        }
        if self.capacity > MAX_BUFFER_CAPACITY {
            return Err(KinesyncError::InvalidConfig(format!(
                "capacity must be at most {MAX_BUFFER_CAPACITY}, got {}",
                self.capacity
            )));
        }
        if !(self.max_delta_time.is_finite() && self.max_delta_time > 0.0) {
            return Err(KinesyncError::InvalidConfig(format!(
                "max_delta_time must be positive, got {}",
                self.max_delta_time
            )));
        }
        validate_delay(self.constant_delay)
    }
}

/// A fixed delay must be a finite, non-negative number of seconds
pub(crate) fn validate_delay(delay: f64) -> KinesyncResult<()> {
    if delay.is_finite() && delay >= 0.0 {
        Ok(())
    } else {
        Err(KinesyncError::InvalidArgument(format!(
            "constant delay must be non-negative, got {delay}"
        )))
    }
}

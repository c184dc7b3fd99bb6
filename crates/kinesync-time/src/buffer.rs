//! Time-synchronized sample buffer
//!
//! Frames arrive with two timestamps: the local time they were received and
//! the source time they claim for themselves. The buffer keeps them ordered
//! by local time, estimates how far behind the source the local side runs,
//! and answers "what did the source look like at local time X" by
//! re-projecting X onto the source timeline and interpolating between the
//! two bracketing frames.
//!
//! No internal locking: one producer and one consumer at a time. Wrap the
//! buffer in a lock if they live on different threads.

use kinesync_core::{KinesyncResult, RingBuffer};

use crate::config::validate_delay;
use crate::{DelayMode, Interpolator, StreamStats, TimedBufferConfig};

/// A value with its local receipt time and source timestamp (seconds)
#[derive(Debug, Clone, PartialEq)]
pub struct TimedSample<T> {
    pub local_time: f64,
    pub source_time: f64,
    pub value: T,
}

impl<T> TimedSample<T> {
    pub fn new(local_time: f64, source_time: f64, value: T) -> Self {
        TimedSample {
            local_time,
            source_time,
            value,
        }
    }
}

/// Ring of timed samples with delay compensation and interpolation
/// INVARIANT: samples ascend strictly by local time
pub struct TimedDataBuffer<T, I> {
    samples: RingBuffer<TimedSample<T>>,
    interpolator: I,
    /// Local gap that triggers a reset
    max_delta_time: f64,
    /// Local time of the first sample after a reset
    time_reference_point: f64,
    /// Source time of the first sample after a reset
    source_time_reference_point: f64,
    /// Largest observed local/source lag since the last reset
    auto_delay: f64,
    constant_delay: f64,
    delay_mode: DelayMode,
    stats: StreamStats,
}

impl<T, I: Interpolator<T>> TimedDataBuffer<T, I> {
    /// Create a buffer retaining at least `capacity` samples
    pub fn new(interpolator: I, capacity: usize, max_delta_time: f64, delay_mode: DelayMode) -> Self {
        TimedDataBuffer {
            samples: RingBuffer::new(capacity),
            interpolator,
            max_delta_time,
            time_reference_point: 0.0,
            source_time_reference_point: 0.0,
            auto_delay: 0.0,
            constant_delay: 0.0,
            delay_mode,
            stats: StreamStats::new(),
        }
    }

    /// Create a buffer from a validated configuration
    pub fn with_config(interpolator: I, config: &TimedBufferConfig) -> KinesyncResult<Self> {
        config.validate()?;
        let mut buffer = Self::new(
            interpolator,
            config.capacity,
            config.max_delta_time,
            config.delay_mode,
        );
        buffer.constant_delay = config.constant_delay;
        Ok(buffer)
    }

    /// Insert a frame received at `local_time` carrying `source_time`
    pub fn add(&mut self, local_time: f64, source_time: f64, value: T) {
        if let Ok(newest) = self.samples.peek_tail() {
            let gap = local_time - newest.local_time;
            if gap > self.max_delta_time {
                tracing::debug!(
                    gap,
                    max_delta_time = self.max_delta_time,
                    "stream discontinuity, resetting buffer"
                );
                self.clear();
                self.stats.discontinuities += 1;
            }
        }

        self.stats.record_arrival(local_time, source_time);
        let sample = TimedSample::new(local_time, source_time, value);

        if self.samples.is_empty() {
            self.time_reference_point = local_time;
            self.source_time_reference_point = source_time;
            self.samples.push(sample);
            self.stats.appended += 1;
            return;
        }

        let len = self.samples.len();
        for index in (0..len).rev() {
            let (prev_local, prev_source) = match self.samples.get(index) {
                Some(s) => (s.local_time, s.source_time),
                None => break,
            };

            let lag = (local_time - prev_local) + (source_time - prev_source);
            self.auto_delay = self.auto_delay.max(lag);

            if prev_local < local_time {
                let offset_from_end = len - index - 1;
                if offset_from_end == 0 {
                    self.samples.enqueue(sample);
                    self.stats.appended += 1;
                } else {
                    tracing::trace!(local_time, offset_from_end, "out-of-order frame");
                    // offset_from_end < len, always in range
                    let _ = self.samples.insert_at_offset_from_tail(offset_from_end, sample);
                    self.stats.reordered += 1;
                }
                return;
            }

            if prev_local == local_time {
                if let Some(slot) = self.samples.get_mut(index) {
                    *slot = sample;
                }
                self.stats.overwritten += 1;
                return;
            }
        }

        tracing::trace!(local_time, "frame older than buffered history");
        self.samples.push(sample);
        self.stats.prepended += 1;
    }

    /// Interpolated value at `local_time`, if the buffer brackets it
    ///
    /// `None` means "not enough data yet" (empty buffer, or the
    /// delay-compensated query falls outside the buffered source range).
    pub fn try_get_sample(&mut self, local_time: f64) -> Option<T> {
        let sample = self.sample_at(local_time);
        if sample.is_some() {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        sample
    }

    /// Same as [`try_get_sample`](Self::try_get_sample) without touching stats
    pub fn sample_at(&self, local_time: f64) -> Option<T> {
        if self.samples.is_empty() {
            return None;
        }

        let timestamp = self.source_timestamp(local_time);

        let mut pairs = self.samples.iter().zip(self.samples.iter().skip(1));
        pairs.find_map(|(prev, next)| {
            let t = (timestamp - prev.source_time) / (next.source_time - prev.source_time);
            if (0.0..=1.0).contains(&t) {
                Some(self.interpolator.interpolate(&prev.value, &next.value, t as f32))
            } else {
                None
            }
        })
    }

    /// Project a local query time onto the source timeline
    pub fn source_timestamp(&self, local_time: f64) -> f64 {
        local_time - self.time_reference_point - self.current_delay()
            + self.source_time_reference_point
    }

    /// Drop all samples and forget the time reference, delay estimate and
    /// offset history; counters are kept
    pub fn clear(&mut self) {
        self.samples.clear();
        self.time_reference_point = 0.0;
        self.source_time_reference_point = 0.0;
        self.auto_delay = 0.0;
        self.stats.reset_timing();
    }

    /// Delay applied under the current mode
    pub fn current_delay(&self) -> f64 {
        match self.delay_mode {
            DelayMode::None => 0.0,
            DelayMode::Auto => self.auto_delay,
            DelayMode::Constant => self.constant_delay,
        }
    }

    pub fn delay_mode(&self) -> DelayMode {
        self.delay_mode
    }

    pub fn set_delay_mode(&mut self, mode: DelayMode) {
        self.delay_mode = mode;
    }

    pub fn constant_delay(&self) -> f64 {
        self.constant_delay
    }

    /// Set the fixed delay used by [`DelayMode::Constant`]
    ///
    /// Fails with `InvalidArgument` for negative or non-finite values.
    pub fn set_constant_delay(&mut self, delay: f64) -> KinesyncResult<()> {
        validate_delay(delay)?;
        self.constant_delay = delay;
        Ok(())
    }

    pub fn auto_delay(&self) -> f64 {
        self.auto_delay
    }

    pub fn max_delta_time(&self) -> f64 {
        self.max_delta_time
    }

    pub fn set_max_delta_time(&mut self, max_delta_time: f64) {
        self.max_delta_time = max_delta_time;
    }

    pub fn time_reference_point(&self) -> f64 {
        self.time_reference_point
    }

    pub fn source_time_reference_point(&self) -> f64 {
        self.source_time_reference_point
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.samples.capacity()
    }

    /// Samples oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &TimedSample<T>> + '_ {
        self.samples.iter()
    }

    /// Newest sample by local time
    pub fn latest(&self) -> Option<&TimedSample<T>> {
        self.samples.peek_tail().ok()
    }

    pub fn interpolator(&self) -> &I {
        &self.interpolator
    }

    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }
}

//! Motion source - a locked, clock-stamped buffer for one data stream
//!
//! The network callback that decodes frames and the render tick that
//! samples them usually run on different threads. `MotionSource` puts the
//! buffer behind a mutex and stamps receipt time from an injected clock.

use std::sync::Arc;

use parking_lot::Mutex;

use kinesync_core::{KinesyncResult, SourceId};
use kinesync_time::{Clock, DelayMode, Interpolator, StreamStats, TimedBufferConfig, TimedDataBuffer};

use crate::{MotionKind, SourceHandle, SourceRegistry};

pub struct MotionSource<T, I> {
    handle: SourceHandle,
    name: String,
    kind: MotionKind,
    clock: Arc<dyn Clock>,
    buffer: Mutex<TimedDataBuffer<T, I>>,
}

impl<T, I: Interpolator<T>> MotionSource<T, I> {
    /// Register a new source and build its buffer from `config`
    pub fn register(
        registry: &SourceRegistry,
        name: impl Into<String>,
        kind: MotionKind,
        clock: Arc<dyn Clock>,
        interpolator: I,
        config: &TimedBufferConfig,
    ) -> KinesyncResult<Self> {
        let buffer = TimedDataBuffer::with_config(interpolator, config)?;
        let name = name.into();
        let handle = registry.register(name.clone(), kind)?;
        Ok(MotionSource {
            handle,
            name,
            kind,
            clock,
            buffer: Mutex::new(buffer),
        })
    }

    pub fn id(&self) -> SourceId {
        self.handle.id()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MotionKind {
        self.kind
    }

    /// Current local time from this source's clock
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Buffer a frame stamped with the current local time
    pub fn receive(&self, source_time: f64, value: T) {
        let local_time = self.clock.now();
        self.buffer.lock().add(local_time, source_time, value);
    }

    /// Buffer a frame with an explicit local receipt time
    pub fn receive_at(&self, local_time: f64, source_time: f64, value: T) {
        self.buffer.lock().add(local_time, source_time, value);
    }

    /// Interpolated frame for the current local time
    pub fn sample(&self) -> Option<T> {
        let now = self.clock.now();
        self.buffer.lock().try_get_sample(now)
    }

    pub fn sample_at(&self, local_time: f64) -> Option<T> {
        self.buffer.lock().try_get_sample(local_time)
    }

    /// Drop buffered frames and the delay estimate
    pub fn reset(&self) {
        self.buffer.lock().clear();
        tracing::debug!(id = %self.id(), name = %self.name, "source reset");
    }

    pub fn set_delay_mode(&self, mode: DelayMode) {
        self.buffer.lock().set_delay_mode(mode);
    }

    pub fn set_constant_delay(&self, delay: f64) -> KinesyncResult<()> {
        self.buffer.lock().set_constant_delay(delay)
    }

    /// Delay currently applied to queries
    pub fn current_delay(&self) -> f64 {
        self.buffer.lock().current_delay()
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    /// Snapshot of the stream statistics
    pub fn stats(&self) -> StreamStats {
        self.buffer.lock().stats().clone()
    }

    /// Run `f` with exclusive access to the buffer
    pub fn with_buffer<R>(&self, f: impl FnOnce(&mut TimedDataBuffer<T, I>) -> R) -> R {
        f(&mut self.buffer.lock())
    }
}

//! Per-stream statistics for passive jitter and offset estimation

use kinesync_core::RingBuffer;

/// Minimum arrivals before offset/jitter estimates are published
const MIN_TIMING_SAMPLES: usize = 5;

/// Counters and timing estimates for a single buffered stream
#[derive(Clone, Debug)]
pub struct StreamStats {
    /// Frames appended after the newest sample
    pub appended: u64,
    /// Frames inserted between existing samples
    pub reordered: u64,
    /// Frames that replaced a sample with the same local time
    pub overwritten: u64,
    /// Frames older than everything retained, pushed at the front
    pub prepended: u64,
    /// Buffer resets caused by a local-time gap
    pub discontinuities: u64,
    /// Queries that produced a sample
    pub hits: u64,
    /// Queries that produced nothing
    pub misses: u64,
    /// Estimated clock offset (local - source), median of recent arrivals
    pub offset: f64,
    /// Jitter envelope (max deviation from `offset`)
    pub jitter_envelope: f64,
    /// Recent (local - source) samples
    offsets: RingBuffer<f64>,
    /// Sort space for the median, sized to the window once
    scratch: Vec<f64>,
}

impl StreamStats {
    pub fn new() -> Self {
        Self::with_window(64)
    }

    /// Keep `window` recent arrivals for the timing estimates
    pub fn with_window(window: usize) -> Self {
        let offsets = RingBuffer::new(window);
        let scratch = Vec::with_capacity(offsets.capacity());
        StreamStats {
            appended: 0,
            reordered: 0,
            overwritten: 0,
            prepended: 0,
            discontinuities: 0,
            hits: 0,
            misses: 0,
            offset: 0.0,
            jitter_envelope: 0.0,
            offsets,
            scratch,
        }
    }

    /// Total frames accepted into the buffer
    pub fn frames(&self) -> u64 {
        self.appended + self.reordered + self.overwritten + self.prepended
    }

    /// Fraction of queries that produced a sample
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }

    /// Whether enough arrivals were seen to trust `offset`
    pub fn has_timing(&self) -> bool {
        self.offsets.len() >= MIN_TIMING_SAMPLES
    }

    /// Update timing estimates with one arrival
    pub(crate) fn record_arrival(&mut self, local_time: f64, source_time: f64) {
        self.offsets.enqueue(local_time - source_time);

        if self.has_timing() {
            self.offset = self.median();
            self.jitter_envelope = self
                .offsets
                .iter()
                .map(|s| (s - self.offset).abs())
                .fold(0.0, f64::max);
        }
    }

    /// Forget timing history; the source clock may have changed
    pub(crate) fn reset_timing(&mut self) {
        self.offsets.clear();
        self.offset = 0.0;
        self.jitter_envelope = 0.0;
    }

    fn median(&mut self) -> f64 {
        self.scratch.clear();
        self.scratch.extend(self.offsets.iter().copied());
        self.scratch.sort_unstable_by(f64::total_cmp);
        let sorted = &self.scratch;
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        }
    }
}

impl Default for StreamStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_estimate() {
        let mut stats = StreamStats::new();

        // ~50ms offset with 0-20ms jitter
        for i in 0..20 {
            let jitter = (i % 5) as f64 * 0.005;
            stats.record_arrival(1.0 + i as f64 * 0.1 + jitter, 0.95 + i as f64 * 0.1);
        }

        assert!(stats.has_timing());
        assert!((stats.offset - 0.06).abs() < 0.02);
        assert!(stats.jitter_envelope <= 0.021);
    }

    #[test]
    fn test_no_estimate_until_enough_samples() {
        let mut stats = StreamStats::new();
        for i in 0..MIN_TIMING_SAMPLES - 1 {
            stats.record_arrival(i as f64 + 0.1, i as f64);
        }
        assert!(!stats.has_timing());
        assert_eq!(stats.offset, 0.0);
    }

    #[test]
    fn test_reset_timing_keeps_counters() {
        let mut stats = StreamStats::new();
        stats.appended = 3;
        for i in 0..10 {
            stats.record_arrival(i as f64 + 0.2, i as f64);
        }
        stats.reset_timing();

        assert!(!stats.has_timing());
        assert_eq!(stats.jitter_envelope, 0.0);
        assert_eq!(stats.appended, 3);
    }

    #[test]
    fn test_steady_arrivals_reuse_sort_space() {
        let mut stats = StreamStats::with_window(16);
        let capacity = stats.scratch.capacity();
        assert!(capacity >= 16);

        for i in 0..500 {
            let t = i as f64 / 60.0;
            let jitter = if i % 2 == 0 { 0.004 } else { 0.0 };
            stats.record_arrival(t + 0.25 + jitter, t);
        }

        assert_eq!(stats.scratch.capacity(), capacity);
        assert!((stats.offset - 0.252).abs() < 1e-9);
        assert!(stats.jitter_envelope <= 0.002 + 1e-9);
    }

    #[test]
    fn test_hit_rate() {
        let mut stats = StreamStats::new();
        assert_eq!(stats.hit_rate(), 0.0);
        stats.hits = 3;
        stats.misses = 1;
        assert!((stats.hit_rate() - 0.75).abs() < 1e-9);
    }
}

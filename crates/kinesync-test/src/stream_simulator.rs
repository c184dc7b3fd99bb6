//! Stream Simulator - Seeded simulation of a remote motion source
//!
//! Simulates:
//! - A source sending frames at a fixed rate on its own clock
//! - Clock offset and drift between source and receiver
//! - Latency, jitter, loss and outages on the link
//! - A render loop sampling the buffer at its own rate
//!
//! Frame values equal their source timestamps, so a correct sample always
//! reproduces the projected source time exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use kinesync_core::KinesyncResult;
use kinesync_time::{DelayMode, LinearInterpolator, TimedBufferConfig, TimedDataBuffer};

/// Source clock relative to the receiver clock
#[derive(Clone, Debug)]
pub struct ClockDriftModel {
    /// Source clock reading when the receiver reads zero
    pub offset: f64,
    /// Source seconds per receiver second (1.0 = perfect)
    pub drift_rate: f64,
}

impl ClockDriftModel {
    pub fn new(offset: f64, drift_rate: f64) -> Self {
        ClockDriftModel { offset, drift_rate }
    }

    /// Same rate, arbitrary epoch
    pub fn perfect() -> Self {
        Self::new(1_000.0, 1.0)
    }

    /// Slightly fast source clock
    pub fn fast() -> Self {
        Self::new(1_000.0, 1.0001)
    }

    /// Slightly slow source clock
    pub fn slow() -> Self {
        Self::new(1_000.0, 0.9999)
    }

    /// Source clock reading at receiver time `t`
    pub fn source_time(&self, t: f64) -> f64 {
        self.offset + t * self.drift_rate
    }
}

/// Jitter distribution (seconds)
#[derive(Clone, Debug)]
pub enum JitterDistribution {
    None,
    Uniform { max: f64 },
    /// Normal, clamped at zero
    Normal { mean: f64, stddev: f64 },
}

impl JitterDistribution {
    pub fn sample(&self, rng: &mut StdRng) -> f64 {
        match self {
            JitterDistribution::None => 0.0,
            JitterDistribution::Uniform { max } => {
                if *max > 0.0 {
                    rng.gen_range(0.0..*max)
                } else {
                    0.0
                }
            }
            JitterDistribution::Normal { mean, stddev } => {
                // Box-Muller
                let u1: f64 = rng.gen::<f64>().max(f64::MIN_POSITIVE);
                let u2: f64 = rng.gen();
                let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
                (mean + stddev * z).max(0.0)
            }
        }
    }
}

/// Link conditions between source and receiver
#[derive(Clone, Debug)]
pub struct LinkConfig {
    /// Fixed one-way latency (seconds)
    pub base_latency: f64,
    pub jitter: JitterDistribution,
    /// Independent loss probability per frame (0.0 - 1.0)
    pub loss_rate: f64,
    /// Probability a frame is held back behind later ones
    pub reorder_prob: f64,
    /// Extra delay for held-back frames (seconds)
    pub reorder_delay: f64,
    /// Frames sent in `[start, end)` are lost
    pub outage: Option<(f64, f64)>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        LinkConfig {
            base_latency: 0.02,
            jitter: JitterDistribution::Uniform { max: 0.005 },
            loss_rate: 0.0,
            reorder_prob: 0.0,
            reorder_delay: 0.0,
            outage: None,
        }
    }
}

impl LinkConfig {
    /// Wired LAN
    pub fn perfect() -> Self {
        LinkConfig {
            base_latency: 0.001,
            jitter: JitterDistribution::None,
            ..Self::default()
        }
    }

    /// Home Wi-Fi
    pub fn wifi() -> Self {
        LinkConfig {
            base_latency: 0.01,
            jitter: JitterDistribution::Normal {
                mean: 0.01,
                stddev: 0.005,
            },
            loss_rate: 0.01,
            reorder_prob: 0.02,
            reorder_delay: 0.02,
            outage: None,
        }
    }

    /// Congested link
    pub fn hostile() -> Self {
        LinkConfig {
            base_latency: 0.05,
            jitter: JitterDistribution::Uniform { max: 0.06 },
            loss_rate: 0.1,
            reorder_prob: 0.1,
            reorder_delay: 0.05,
            outage: None,
        }
    }

    fn in_outage(&self, send_time: f64) -> bool {
        matches!(self.outage, Some((start, end)) if send_time >= start && send_time < end)
    }
}

/// One frame as seen by the receiver
#[derive(Clone, Debug, PartialEq)]
pub struct Delivery {
    /// Frame number at the source
    pub sequence: u64,
    /// Receiver clock at arrival
    pub local_time: f64,
    /// Source clock at send
    pub source_time: f64,
}

/// A remote source streaming frames over a simulated link
pub struct SimulatedStream {
    /// Frames per second at the source
    pub rate_hz: f64,
    pub drift: ClockDriftModel,
    pub link: LinkConfig,
    rng: StdRng,
    next_sequence: u64,
    in_flight: Vec<Delivery>,
    sent: u64,
    lost: u64,
}

impl SimulatedStream {
    pub fn new(rate_hz: f64, drift: ClockDriftModel, link: LinkConfig, seed: u64) -> Self {
        SimulatedStream {
            rate_hz,
            drift,
            link,
            rng: StdRng::seed_from_u64(seed),
            next_sequence: 0,
            in_flight: Vec::new(),
            sent: 0,
            lost: 0,
        }
    }

    /// Receiver time at which frame `sequence` is sent
    pub fn send_time(&self, sequence: u64) -> f64 {
        sequence as f64 / self.rate_hz
    }

    /// Frames arriving by receiver time `now`, in arrival order
    pub fn deliveries_until(&mut self, now: f64) -> Vec<Delivery> {
        while self.send_time(self.next_sequence) <= now {
            let sequence = self.next_sequence;
            self.next_sequence += 1;
            self.sent += 1;

            let send_time = self.send_time(sequence);
            if self.link.in_outage(send_time) || self.rng.gen_bool(self.link.loss_rate) {
                self.lost += 1;
                continue;
            }

            let mut delay = self.link.base_latency + self.link.jitter.sample(&mut self.rng);
            if self.rng.gen_bool(self.link.reorder_prob) {
                delay += self.link.reorder_delay;
            }

            self.in_flight.push(Delivery {
                sequence,
                local_time: send_time + delay,
                source_time: self.drift.source_time(send_time),
            });
        }

        let (mut arrived, pending): (Vec<_>, Vec<_>) = self
            .in_flight
            .drain(..)
            .partition(|d| d.local_time <= now);
        self.in_flight = pending;
        arrived.sort_by(|a, b| a.local_time.total_cmp(&b.local_time));
        arrived
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }

    pub fn lost(&self) -> u64 {
        self.lost
    }
}

/// Simulation result and statistics
#[derive(Debug, Default)]
pub struct SimulationResult {
    /// Render ticks executed
    pub total_ticks: u64,
    /// Ticks that produced a sample
    pub hits: u64,
    /// Ticks that produced nothing
    pub misses: u64,
    /// Worst difference between a sample and its projected source time
    pub max_error: f64,
    /// Buffer resets caused by gaps
    pub discontinuities: u64,
    /// Frames delivered into the buffer
    pub frames_delivered: u64,
    /// How far behind the live source clock each hit was (seconds)
    latency_samples: Vec<f64>,
}

impl SimulationResult {
    pub fn new() -> Self {
        SimulationResult::default()
    }

    fn record_hit(&mut self, error: f64, latency: f64) {
        self.total_ticks += 1;
        self.hits += 1;
        self.max_error = self.max_error.max(error);
        self.latency_samples.push(latency);
    }

    fn record_miss(&mut self) {
        self.total_ticks += 1;
        self.misses += 1;
    }

    pub fn hit_rate(&self) -> f64 {
        if self.total_ticks == 0 {
            return 0.0;
        }
        self.hits as f64 / self.total_ticks as f64
    }

    /// Mean distance behind the live source (seconds)
    pub fn avg_latency(&self) -> f64 {
        if self.latency_samples.is_empty() {
            return 0.0;
        }
        self.latency_samples.iter().sum::<f64>() / self.latency_samples.len() as f64
    }

    pub fn max_latency(&self) -> f64 {
        self.latency_samples.iter().copied().fold(0.0, f64::max)
    }
}

/// Render loop sampling one buffered stream
pub struct StreamSimulator {
    stream: SimulatedStream,
    buffer: TimedDataBuffer<f64, LinearInterpolator>,
    /// Render tick (seconds)
    render_interval: f64,
    /// Receiver clock
    time: f64,
}

impl StreamSimulator {
    /// Fails when `config` does not validate
    pub fn new(
        stream: SimulatedStream,
        config: &TimedBufferConfig,
        render_interval: f64,
    ) -> KinesyncResult<Self> {
        let buffer = TimedDataBuffer::with_config(LinearInterpolator, config)?;

        Ok(StreamSimulator {
            stream,
            buffer,
            render_interval,
            time: 0.0,
        })
    }

    /// Run for `duration` seconds of receiver time
    pub fn run(&mut self, duration: f64) -> SimulationResult {
        let mut result = SimulationResult::new();
        let ticks = (duration / self.render_interval).round() as u64;

        for _ in 0..ticks {
            self.tick(&mut result);
        }

        result.discontinuities = self.buffer.stats().discontinuities;
        result
    }

    fn tick(&mut self, result: &mut SimulationResult) {
        self.time += self.render_interval;

        for delivery in self.stream.deliveries_until(self.time) {
            self.buffer
                .add(delivery.local_time, delivery.source_time, delivery.source_time);
            result.frames_delivered += 1;
        }

        let projected = self.buffer.source_timestamp(self.time);
        match self.buffer.try_get_sample(self.time) {
            Some(value) => {
                let live = self.stream.drift.source_time(self.time);
                result.record_hit((value - projected).abs(), live - value);
            }
            None => result.record_miss(),
        }
    }

    pub fn buffer(&self) -> &TimedDataBuffer<f64, LinearInterpolator> {
        &self.buffer
    }

    pub fn stream(&self) -> &SimulatedStream {
        &self.stream
    }

    pub fn time(&self) -> f64 {
        self.time
    }
}

/// Predefined test scenarios
pub mod scenarios {
    use super::*;

    const SOURCE_HZ: f64 = 60.0;
    const RENDER_INTERVAL: f64 = 1.0 / 90.0;

    fn simulator(
        drift: ClockDriftModel,
        link: LinkConfig,
        config: TimedBufferConfig,
        seed: u64,
    ) -> KinesyncResult<StreamSimulator> {
        let stream = SimulatedStream::new(SOURCE_HZ, drift, link, seed);
        StreamSimulator::new(stream, &config, RENDER_INTERVAL)
    }

    /// Wired source, perfect clock
    pub fn steady() -> KinesyncResult<StreamSimulator> {
        simulator(ClockDriftModel::perfect(), LinkConfig::perfect(), TimedBufferConfig::default(), 1)
    }

    /// Wi-Fi source
    pub fn wifi() -> KinesyncResult<StreamSimulator> {
        simulator(ClockDriftModel::perfect(), LinkConfig::wifi(), TimedBufferConfig::high_jitter(), 2)
    }

    /// Wired source with a drifting clock
    pub fn drifting(drift: ClockDriftModel) -> KinesyncResult<StreamSimulator> {
        simulator(drift, LinkConfig::perfect(), TimedBufferConfig::default(), 3)
    }

    /// Congested link
    pub fn hostile() -> KinesyncResult<StreamSimulator> {
        simulator(ClockDriftModel::perfect(), LinkConfig::hostile(), TimedBufferConfig::high_jitter(), 4)
    }

    /// Source drops out for `length` seconds starting at `start`
    pub fn outage(start: f64, length: f64) -> KinesyncResult<StreamSimulator> {
        let link = LinkConfig {
            outage: Some((start, start + length)),
            ..LinkConfig::perfect()
        };
        simulator(ClockDriftModel::perfect(), link, TimedBufferConfig::default(), 5)
    }

    /// Fixed delay instead of the running estimate
    pub fn constant_delay(delay: f64) -> KinesyncResult<StreamSimulator> {
        let config = TimedBufferConfig {
            delay_mode: DelayMode::Constant,
            constant_delay: delay,
            ..TimedBufferConfig::high_jitter()
        };
        simulator(ClockDriftModel::perfect(), LinkConfig::wifi(), config, 6)
    }
}

//! KineSync Time - Time-synchronized sample buffering
//!
//! This crate implements the timing side of motion ingestion:
//! - Timed data buffer: out-of-order insertion ordered by local receipt time
//! - Delay estimation and local → source timeline projection
//! - Interpolation strategies plugged into the buffer
//! - Clock sources injected by the owner of a buffer
//! - Passive per-stream statistics (offset, jitter, reorders)

pub mod buffer;
pub mod clock;
pub mod config;
pub mod interpolate;
pub mod stats;

pub use buffer::*;
pub use clock::*;
pub use config::*;
pub use interpolate::*;
pub use stats::*;

//! KineSync Test Harness - Stream simulation and end-to-end validation
//!
//! This crate provides:
//! - Seeded simulation of remote sources (clock drift, latency, jitter, loss)
//! - Render-loop simulation against a single buffer
//! - End-to-end performer playback through frame feeds

pub mod integration;
pub mod stream_simulator;

pub use integration::*;
pub use stream_simulator::*;

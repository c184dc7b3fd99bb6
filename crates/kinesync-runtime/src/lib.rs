//! KineSync Runtime - Wiring buffers to live sources
//!
//! - Registry: which sources are live, with ids freed on drop
//! - Source: a clock-stamped, lock-protected buffer per stream
//! - Feed: bounded, non-blocking hand-off from receive tasks
//! - Performer: the body/finger/face/eye streams of one person
//! - Config and logging setup

pub mod config;
pub mod feed;
pub mod logging;
pub mod performer;
pub mod registry;
pub mod source;

pub use config::*;
pub use feed::{channel, FrameReceiver, FrameSender};
pub use logging::*;
pub use performer::*;
pub use registry::*;
pub use source::*;

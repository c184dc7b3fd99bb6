//! KineSync Core - Fundamental types and primitives
//!
//! This crate defines the building blocks shared by every KineSync crate:
//! - Fixed-capacity ring buffer (power-of-two, O(1) push at both ends)
//! - Source identifiers and a thread-safe id allocator
//! - Error types

pub mod error;
pub mod id;
pub mod ring;

pub use error::*;
pub use id::*;
pub use ring::*;

//! KineSync Motion - Motion frame types and interpolation
//!
//! Frames are plain value types decoded by protocol receivers elsewhere:
//!
//! - Body: root transform + humanoid bone transforms
//! - Finger: per-joint rotations for both hands
//! - Face: sparse blend shape weights + optional head rotation
//! - Eye: per-eye gaze rotation
//!
//! Rotations always blend by shortest-arc slerp. Optional channels only
//! blend when present at both ends. Fixed bone arrays blend slot by slot.

pub mod body;
pub mod eye;
pub mod face;
pub mod finger;
pub mod lerp;
pub mod math;

pub use body::*;
pub use eye::*;
pub use face::*;
pub use finger::*;
pub use lerp::*;
pub use math::*;

//! Physics module - hand pose heuristics and adaptive smoothing
//!
//! Re-exports only. All logic in submodules.

mod interp;
mod one_euro;
mod shoulder;
mod state;

pub use interp::{clamp01, inverse_lerp, lerp, window};
pub use one_euro::{FilterConfig, FilterState, FilterValue, OneEuroFilter, MIN_DT};
pub use shoulder::{estimate as estimate_shoulder, AnatomicalConfig};
pub use state::{HeadPose, JointSample, TrackedJoints};

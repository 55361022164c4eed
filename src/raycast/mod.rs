//! Raycast module - per-frame aiming strategies
//!
//! Re-exports only. All logic in submodules.

mod algorithm;
mod provider;
mod variable_shoulder;

pub use algorithm::{RayAlgorithm, RayResult};
pub use provider::RayProvider;
pub use variable_shoulder::{normalize_direction, VariableShoulderRaycaster, MIN_DIRECTION_NORM};

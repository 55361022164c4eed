//! Hand Raycast - stable aiming rays from tracked hand joints
//!
//! Turns noisy thumb/index/middle/wrist positions plus the head pose into a
//! ray (locus + unit direction) each frame:
//! - physics: shoulder estimation and One Euro smoothing
//! - raycast: the per-frame algorithm and the host-facing step
//! - bridge: wasm_bindgen entry points for browser hosts

pub mod bridge;
pub mod config;
pub mod error;
pub mod physics;
pub mod raycast;

pub use config::{FilterSet, PinchBlend, RaycasterConfig};
pub use error::{RaycastError, Result};
pub use physics::{AnatomicalConfig, FilterConfig, HeadPose, JointSample, OneEuroFilter};
pub use raycast::{RayAlgorithm, RayProvider, RayResult, VariableShoulderRaycaster};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    tracing::info!("hand-raycast v{} loaded", env!("CARGO_PKG_VERSION"));
}

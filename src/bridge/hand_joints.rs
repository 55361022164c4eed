//! Hand joint bridge - per-frame ray requests from JavaScript
//!
//! The host pushes joints, head pose and its frame timestamp, and gets the
//! smoothed ray back in the same call. Flat Float32Array layouts:
//! - joints: thumb, index, mid, wrist (x, y, z each) = 12 floats
//! - head: position xyz, rotation xyzw, scale xyz = 10 floats
//! - ray: locus xyz, direction xyz = 6 floats

use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use std::cell::RefCell;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;

use crate::config::RaycasterConfig;
use crate::error::{RaycastError, Result};
use crate::physics::{HeadPose, JointSample};
use crate::raycast::{RayProvider, RayResult, VariableShoulderRaycaster};

// ============================================================================
// BUFFER LAYOUT
// ============================================================================

pub const THUMB: usize = 0;
pub const INDEX: usize = 1;
pub const MID: usize = 2;
pub const WRIST: usize = 3;

pub const JOINT_COUNT: usize = 4;
pub const JOINT_BUFFER_LEN: usize = JOINT_COUNT * 3;
pub const HEAD_BUFFER_LEN: usize = 10;
pub const RAY_BUFFER_LEN: usize = 6;

/// Quaternions shorter than this cannot be normalized
const MIN_QUATERNION_NORM: f32 = 1e-6;

// ============================================================================
// STATE
// ============================================================================

struct RaycastState {
    provider: RayProvider<VariableShoulderRaycaster>,
}

impl RaycastState {
    fn from_config(config: &RaycasterConfig) -> Self {
        Self {
            provider: RayProvider::new(VariableShoulderRaycaster::new(config), config.reset_on_tracking_loss),
        }
    }
}

impl Default for RaycastState {
    fn default() -> Self {
        Self::from_config(&RaycasterConfig::default())
    }
}

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static RAYCAST_STATE: RefCell<RaycastState> = RefCell::new(RaycastState::default());
}

// ============================================================================
// WASM API
// ============================================================================

/// Replace the raycaster with one built from JSON config (partial JSON allowed)
#[wasm_bindgen]
pub fn configure_raycaster(config_json: &str) -> std::result::Result<(), JsValue> {
    let config = RaycasterConfig::from_json(config_json)?;
    install_config(&config);
    Ok(())
}

/// Forget all smoothing history
#[wasm_bindgen]
pub fn reset_raycaster() {
    RAYCAST_STATE.with(|state_cell| state_cell.borrow_mut().provider.reset());
}

/// Run one frame. Returns [locus xyz, direction xyz], or nothing when no
/// ray should be shown this frame.
///
/// Bit `i` of `present_mask` marks joint `i` (thumb, index, mid, wrist) as tracked.
#[wasm_bindgen]
pub fn step_ray(timestamp: f64, joints: &[f32], present_mask: u8, head: &[f32]) -> Option<Vec<f32>> {
    let (sample, head_pose) = match parse_frame(joints, present_mask, head) {
        Ok(frame) => frame,
        Err(err) => {
            warn!("Dropping frame: {}", err);
            return None;
        }
    };

    RAYCAST_STATE
        .with(|state_cell| state_cell.borrow_mut().provider.step(timestamp, &sample, &head_pose))
        .map(|ray| encode_ray(&ray))
}

// ============================================================================
// INTERNAL API (no wasm_bindgen)
// ============================================================================

/// Rebuild the thread's raycaster from an already validated config
pub fn install_config(config: &RaycasterConfig) {
    RAYCAST_STATE.with(|state_cell| {
        *state_cell.borrow_mut() = RaycastState::from_config(config);
    });
    info!(
        wrist_amplification = config.anatomy.wrist_amplification,
        elbow_tracked_radius = config.anatomy.elbow_tracked_radius,
        reset_on_tracking_loss = config.reset_on_tracking_loss,
        "Raycaster configured"
    );
}

fn parse_frame(joints: &[f32], present_mask: u8, head: &[f32]) -> Result<(JointSample, HeadPose)> {
    Ok((parse_joint_sample(joints, present_mask)?, parse_head_pose(head)?))
}

pub fn parse_joint_sample(data: &[f32], present_mask: u8) -> Result<JointSample> {
    check_len("joints", data, JOINT_BUFFER_LEN)?;

    let joint = |i: usize| -> Result<Option<Vector3<f32>>> {
        if present_mask & (1 << i) == 0 {
            return Ok(None);
        }
        Ok(Some(read_vec3("joints", &data[i * 3..i * 3 + 3])?))
    };

    Ok(JointSample {
        thumb: joint(THUMB)?,
        index: joint(INDEX)?,
        mid: joint(MID)?,
        wrist: joint(WRIST)?,
    })
}

pub fn parse_head_pose(data: &[f32]) -> Result<HeadPose> {
    check_len("head", data, HEAD_BUFFER_LEN)?;

    let position = read_vec3("head.position", &data[0..3])?;
    let [x, y, z, w] = [data[3], data[4], data[5], data[6]];
    let quaternion = Quaternion::new(w, x, y, z);
    if !quaternion.coords.iter().all(|v| v.is_finite()) {
        return Err(RaycastError::NonFinite {
            field: "head.rotation",
            value: quaternion.norm(),
        });
    }
    let rotation =
        UnitQuaternion::try_new(quaternion, MIN_QUATERNION_NORM).ok_or(RaycastError::DegenerateRotation)?;
    let scale = read_vec3("head.scale", &data[7..10])?;

    Ok(HeadPose::new(position, rotation, scale))
}

pub fn encode_ray(ray: &RayResult) -> Vec<f32> {
    let mut out = Vec::with_capacity(RAY_BUFFER_LEN);
    out.extend_from_slice(ray.locus.as_slice());
    out.extend_from_slice(ray.direction.as_slice());
    out
}

fn check_len(what: &'static str, data: &[f32], expected: usize) -> Result<()> {
    if data.len() != expected {
        return Err(RaycastError::BufferLength {
            what,
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

fn read_vec3(field: &'static str, xyz: &[f32]) -> Result<Vector3<f32>> {
    if let Some(bad) = xyz.iter().find(|v| !v.is_finite()) {
        return Err(RaycastError::NonFinite { field, value: *bad });
    }
    Ok(Vector3::new(xyz[0], xyz[1], xyz[2]))
}

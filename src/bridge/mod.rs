//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod hand_joints;

pub use hand_joints::{
    // WASM entry points
    configure_raycaster,
    reset_raycaster,
    step_ray,
    // Internal API
    install_config,
    parse_joint_sample,
    parse_head_pose,
    encode_ray,
    // Buffer layout
    THUMB, INDEX, MID, WRIST,
    JOINT_COUNT, JOINT_BUFFER_LEN, HEAD_BUFFER_LEN, RAY_BUFFER_LEN,
};

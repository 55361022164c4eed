//! Error types for configuration and host buffers
//!
//! The per-frame path never errors; a frame without a ray is `None`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RaycastError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Head rotation quaternion has zero length")]
    DegenerateRotation,

    #[error("Invalid {what} buffer length: {actual} (expected {expected})")]
    BufferLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, RaycastError>;

impl From<RaycastError> for wasm_bindgen::JsValue {
    fn from(err: RaycastError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

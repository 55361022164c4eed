//! Ray algorithm contract shared by all aiming strategies

use nalgebra::{Unit, Vector3};

use crate::physics::{HeadPose, JointSample};

/// Aiming ray for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayResult {
    /// Fine interaction point near the pinch
    pub locus: Vector3<f32>,
    pub direction: Unit<Vector3<f32>>,
}

/// A per-frame strategy turning hand joints into an aiming ray.
///
/// `None` means "no ray this frame": the consumer hides its cursor rather
/// than reusing an older ray.
pub trait RayAlgorithm {
    /// Whether the sample carries every joint this strategy needs
    fn is_valid(&self, sample: &JointSample) -> bool;

    fn get_ray(&mut self, sample: &JointSample, head: &HeadPose, timestamp: f64) -> Option<RayResult>;

    /// Drop any temporal state
    fn reset(&mut self) {}
}

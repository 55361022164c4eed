//! Variable shoulder estimation
//!
//! Infers an elbow/shoulder anchor from where the hand sits relative to the
//! head. The hand's elevation and lateral offset, measured in a head frame
//! with pitch and roll removed, slide the anchor over an ellipsoid around a
//! nominal elbow location. Heuristic only: no skeletal solve is attempted.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use super::interp::{clamp01, inverse_lerp, window};
use super::state::HeadPose;

/// Anatomical tuning, head-local units (centimetres)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnatomicalConfig {
    /// Nominal elbow joint location relative to the head
    pub elbow_location: Vector3<f32>,
    /// Larger = more sensitive motion, and more unwanted movement
    pub elbow_radius: f32,
    /// 1.0 = spherical joint, other values stretch it horizontally
    pub elbow_radius_horizontal_factor: f32,
    /// Distance the hand can travel while still moving the elbow
    pub elbow_tracked_radius: f32,
    /// Weight of the wrist vector against the shoulder vector in the aim ray
    pub wrist_amplification: f32,
    /// Depth offset of the elbow relative to the shoulder
    pub elbow_z_offset_scale: f32,
}

impl AnatomicalConfig {
    pub fn elbow_radius_horizontal(&self) -> f32 {
        self.elbow_radius * self.elbow_radius_horizontal_factor
    }

    pub fn elbow_tracked_radius_horizontal(&self) -> f32 {
        self.elbow_tracked_radius * self.elbow_radius_horizontal_factor
    }
}

impl Default for AnatomicalConfig {
    fn default() -> Self {
        Self {
            elbow_location: Vector3::new(10.0, -10.0, -5.0),
            elbow_radius: 10.0,
            elbow_radius_horizontal_factor: 1.0,
            elbow_tracked_radius: 30.0,
            wrist_amplification: 2.5,
            elbow_z_offset_scale: 0.5,
        }
    }
}

/// Estimate the shoulder anchor for a hand position, in world space
pub fn estimate(hand: &Vector3<f32>, head: &HeadPose, config: &AnatomicalConfig) -> Vector3<f32> {
    let hand_local = head.leveled().inverse_transform_point(hand);
    let hand_elevation = hand_local.y;
    let hand_lateral = hand_local.x;

    let elbow = config.elbow_location;
    let tracked = config.elbow_tracked_radius;
    let tracked_horizontal = config.elbow_tracked_radius_horizontal();

    let elevation_interval = clamp01(inverse_lerp(elbow.y + tracked, elbow.y - tracked, hand_elevation));
    let lateral_interval = clamp01(inverse_lerp(
        elbow.x + tracked_horizontal,
        elbow.x - tracked_horizontal,
        hand_lateral,
    ));

    let window_y = window(elevation_interval);
    let window_x = window(lateral_interval);

    let radius_horizontal = config.elbow_radius_horizontal();
    let (sin_x, cos_x) = (-PI * window_x).sin_cos();
    let (sin_y, cos_y) = (-PI * window_y).sin_cos();

    let offset = elbow
        + Vector3::new(
            cos_x * radius_horizontal,
            cos_y * config.elbow_radius,
            sin_x * radius_horizontal + sin_y * config.elbow_z_offset_scale,
        );

    // Placed with the real head orientation, not the leveled one
    head.transform_point(&offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;

    fn at_elevation(y: f32) -> Vector3<f32> {
        estimate(&Vector3::new(10.0, y, -30.0), &HeadPose::identity(), &AnatomicalConfig::default())
    }

    fn at_lateral(x: f32) -> Vector3<f32> {
        estimate(&Vector3::new(x, -10.0, -30.0), &HeadPose::identity(), &AnatomicalConfig::default())
    }

    #[test]
    fn test_identity_head_estimate_is_finite() {
        let shoulder = estimate(
            &Vector3::new(0.0, 0.0, -10.0),
            &HeadPose::identity(),
            &AnatomicalConfig::default(),
        );
        assert!(shoulder.iter().all(|v| v.is_finite()));

        // Stays on the elbow ellipsoid
        let config = AnatomicalConfig::default();
        let offset = shoulder - config.elbow_location;
        assert!(offset.norm() <= config.elbow_radius * 2.0 + config.elbow_z_offset_scale);
    }

    #[test]
    fn test_continuous_across_elevation_boundaries() {
        // elbow.y +/- tracked radius = 20 and -40
        for boundary in [20.0_f32, -40.0] {
            let below = at_elevation(boundary - 1e-3);
            let above = at_elevation(boundary + 1e-3);
            assert!(
                (above - below).norm() < 1e-2,
                "Jump of {} at elevation {}",
                (above - below).norm(),
                boundary
            );
        }
    }

    #[test]
    fn test_continuous_across_lateral_boundaries() {
        // elbow.x +/- horizontal tracked radius = 40 and -20
        for boundary in [40.0_f32, -20.0] {
            let left = at_lateral(boundary - 1e-3);
            let right = at_lateral(boundary + 1e-3);
            assert!((right - left).norm() < 1e-2, "Jump at lateral {}", boundary);
        }
    }

    #[test]
    fn test_saturates_outside_tracked_radius() {
        assert_relative_eq!(at_elevation(60.0), at_elevation(200.0), epsilon = 1e-5);
        assert_relative_eq!(at_lateral(-50.0), at_lateral(-500.0), epsilon = 1e-5);
    }

    #[test]
    fn test_follows_head_yaw() {
        let config = AnatomicalConfig::default();
        let hand = Vector3::new(5.0, -15.0, -35.0);
        let base = estimate(&hand, &HeadPose::identity(), &config);

        let yaw = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.8);
        let head = HeadPose::new(Vector3::zeros(), yaw, Vector3::repeat(1.0));
        let turned = estimate(&(yaw * hand), &head, &config);

        assert_relative_eq!(turned, yaw * base, epsilon = 1e-3);
    }

    #[test]
    fn test_ignores_head_pitch_for_intervals() {
        // Pitching the head must not change which part of the ellipsoid is used
        let config = AnatomicalConfig::default();
        let hand = Vector3::new(5.0, -15.0, -35.0);
        let pitch = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.5);
        let head = HeadPose::new(Vector3::zeros(), pitch, Vector3::repeat(1.0));

        let pitched = estimate(&hand, &head, &config);
        let level_offset = estimate(&hand, &HeadPose::identity(), &config);
        assert_relative_eq!(pitched, pitch * level_offset, epsilon = 1e-3);
    }
}

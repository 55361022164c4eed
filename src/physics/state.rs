//! Per-frame input state - joint sample and head pose
//!
//! Both are immutable values handed in by the host each frame.

use nalgebra::{UnitQuaternion, Vector3};

/// Below this a scale component is treated as zero
const POSE_EPSILON: f32 = 1e-6;

/// Horizontal heading shorter than this means the head points straight up or down
const HEADING_EPSILON: f32 = 1e-4;

/// Hand joints used for aiming, each present only while tracked this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointSample {
    pub thumb: Option<Vector3<f32>>,
    pub index: Option<Vector3<f32>>,
    pub mid: Option<Vector3<f32>>,
    pub wrist: Option<Vector3<f32>>,
}

/// A joint sample with every joint present
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedJoints {
    pub thumb: Vector3<f32>,
    pub index: Vector3<f32>,
    pub mid: Vector3<f32>,
    pub wrist: Vector3<f32>,
}

impl JointSample {
    pub fn new(
        thumb: Vector3<f32>,
        index: Vector3<f32>,
        mid: Vector3<f32>,
        wrist: Vector3<f32>,
    ) -> Self {
        Self {
            thumb: Some(thumb),
            index: Some(index),
            mid: Some(mid),
            wrist: Some(wrist),
        }
    }

    /// All four joints, or None if any is missing
    pub fn tracked(&self) -> Option<TrackedJoints> {
        Some(TrackedJoints {
            thumb: self.thumb?,
            index: self.index?,
            mid: self.mid?,
            wrist: self.wrist?,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.tracked().is_some()
    }
}

impl TrackedJoints {
    pub fn is_finite(&self) -> bool {
        [self.thumb, self.index, self.mid, self.wrist]
            .iter()
            .all(|joint| joint.iter().all(|v| v.is_finite()))
    }
}

/// World pose of the viewer's head (camera)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadPose {
    pub position: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub scale: Vector3<f32>,
}

impl HeadPose {
    pub fn new(position: Vector3<f32>, rotation: UnitQuaternion<f32>, scale: Vector3<f32>) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn identity() -> Self {
        Self::new(Vector3::zeros(), UnitQuaternion::identity(), Vector3::repeat(1.0))
    }

    /// Head-local point to world space (scale, then rotate, then translate)
    pub fn transform_point(&self, local: &Vector3<f32>) -> Vector3<f32> {
        self.position + self.rotation * local.component_mul(&self.scale)
    }

    /// World point to head-local space
    pub fn inverse_transform_point(&self, world: &Vector3<f32>) -> Vector3<f32> {
        let safe_scale = self.scale.map(|s| {
            if s.abs() < POSE_EPSILON {
                POSE_EPSILON.copysign(s)
            } else {
                s
            }
        });
        (self.rotation.inverse() * (world - self.position)).component_div(&safe_scale)
    }

    /// Same position and scale, rotation reduced to yaw so local up is world up
    pub fn leveled(&self) -> HeadPose {
        Self::new(self.position, level_rotation(&self.rotation), self.scale)
    }
}

impl Default for HeadPose {
    fn default() -> Self {
        Self::identity()
    }
}

/// Keep only the heading of `rotation`.
///
/// The camera looks down -Z, so its local +Z ("back") projected onto the
/// horizontal plane gives the heading. Looking straight up or down leaves no
/// horizontal back vector; the head's up vector points along the heading then.
fn level_rotation(rotation: &UnitQuaternion<f32>) -> UnitQuaternion<f32> {
    let back = rotation * Vector3::z();
    let mut heading = Vector3::new(back.x, 0.0, back.z);

    if heading.norm() < HEADING_EPSILON {
        let up = rotation * Vector3::y();
        let sign = if back.y > 0.0 { -1.0 } else { 1.0 };
        heading = Vector3::new(up.x, 0.0, up.z) * sign;
    }

    if heading.norm() < HEADING_EPSILON {
        return UnitQuaternion::identity();
    }
    UnitQuaternion::face_towards(&heading, &Vector3::y())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_tracked_requires_all_joints() {
        let full = JointSample::new(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, -10.0),
            Vector3::new(0.0, -2.0, -8.0),
            Vector3::new(0.0, -5.0, -5.0),
        );
        assert!(full.is_complete());

        let mut no_mid = full;
        no_mid.mid = None;
        assert!(no_mid.tracked().is_none());
        assert!(!JointSample::default().is_complete());
    }

    #[test]
    fn test_tracked_joints_finiteness() {
        let mut sample = JointSample::new(Vector3::zeros(), Vector3::zeros(), Vector3::zeros(), Vector3::zeros());
        assert!(sample.tracked().unwrap().is_finite());

        sample.wrist = Some(Vector3::new(0.0, f32::INFINITY, 0.0));
        assert!(!sample.tracked().unwrap().is_finite());
    }

    #[test]
    fn test_transform_round_trip() {
        let head = HeadPose::new(
            Vector3::new(3.0, 160.0, -2.0),
            UnitQuaternion::from_euler_angles(0.2, -0.7, 0.1),
            Vector3::new(1.0, 2.0, 0.5),
        );
        let world = Vector3::new(12.0, 140.0, -40.0);
        let local = head.inverse_transform_point(&world);
        assert_relative_eq!(head.transform_point(&local), world, epsilon = 1e-3);
    }

    #[test]
    fn test_leveled_keeps_yaw_only() {
        let yaw = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.6);
        let pitch = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -0.4);
        let roll = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.3);
        let head = HeadPose::new(Vector3::new(1.0, 2.0, 3.0), yaw * pitch * roll, Vector3::repeat(1.0));

        let leveled = head.leveled();
        assert_relative_eq!(leveled.rotation * Vector3::y(), Vector3::y(), epsilon = 1e-5);
        assert_relative_eq!(leveled.rotation * Vector3::z(), yaw * Vector3::z(), epsilon = 1e-5);
        assert_eq!(leveled.position, head.position);
    }

    #[test]
    fn test_leveled_identity_is_identity() {
        let leveled = HeadPose::identity().leveled();
        assert_relative_eq!(leveled.rotation * Vector3::x(), Vector3::x(), epsilon = 1e-6);
        assert_relative_eq!(leveled.rotation * Vector3::z(), Vector3::z(), epsilon = 1e-6);
    }

    #[test]
    fn test_leveled_looking_straight_down() {
        let yaw = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 1.0);
        let down = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -FRAC_PI_2);
        let head = HeadPose::new(Vector3::zeros(), yaw * down, Vector3::repeat(1.0));

        let leveled = head.leveled();
        assert_relative_eq!(leveled.rotation * Vector3::z(), yaw * Vector3::z(), epsilon = 1e-4);
    }

    #[test]
    fn test_zero_scale_stays_finite() {
        let head = HeadPose::new(Vector3::zeros(), UnitQuaternion::identity(), Vector3::new(1.0, 0.0, 1.0));
        let local = head.inverse_transform_point(&Vector3::new(1.0, 1.0, 1.0));
        assert!(local.iter().all(|v| v.is_finite()));
    }
}

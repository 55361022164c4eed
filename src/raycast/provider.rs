//! Host-facing frame step
//!
//! The host's own scheduler calls `step` once per frame. The provider
//! watches tracking transitions and timestamp ordering around the algorithm.

use tracing::{debug, trace, warn};

use super::algorithm::{RayAlgorithm, RayResult};
use crate::physics::{HeadPose, JointSample};

pub struct RayProvider<A> {
    algorithm: A,
    reset_on_tracking_loss: bool,
    was_tracking: bool,
    last_timestamp: Option<f64>,
}

impl<A: RayAlgorithm> RayProvider<A> {
    pub fn new(algorithm: A, reset_on_tracking_loss: bool) -> Self {
        Self {
            algorithm,
            reset_on_tracking_loss,
            was_tracking: false,
            last_timestamp: None,
        }
    }

    /// Advance one frame. `None` means suppress targeting this frame.
    pub fn step(&mut self, timestamp: f64, sample: &JointSample, head: &HeadPose) -> Option<RayResult> {
        if let Some(last) = self.last_timestamp {
            if timestamp < last {
                warn!(timestamp, last, "Frame timestamp went backwards");
            }
        }
        self.last_timestamp = Some(self.last_timestamp.map_or(timestamp, |last| last.max(timestamp)));

        let tracking = self.algorithm.is_valid(sample);
        if tracking != self.was_tracking {
            if tracking {
                debug!("Hand found");
            } else {
                debug!("Hand lost");
                if self.reset_on_tracking_loss {
                    self.algorithm.reset();
                    debug!("Ray filters reset");
                }
            }
            self.was_tracking = tracking;
        }

        let ray = self.algorithm.get_ray(sample, head, timestamp);
        if let Some(ray) = &ray {
            trace!(
                locus = ?ray.locus,
                direction = ?ray.direction.into_inner(),
                "Ray updated"
            );
        }
        ray
    }

    /// Clear temporal state, e.g. after a configuration change or scene reload
    pub fn reset(&mut self) {
        self.algorithm.reset();
        self.was_tracking = false;
        self.last_timestamp = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.was_tracking
    }

    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    pub fn algorithm_mut(&mut self) -> &mut A {
        &mut self.algorithm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RaycasterConfig;
    use crate::raycast::VariableShoulderRaycaster;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn sample_at(offset: Vector3<f32>) -> JointSample {
        JointSample::new(
            Vector3::new(0.0, 0.0, 0.0) + offset,
            Vector3::new(0.0, 0.0, -10.0) + offset,
            Vector3::new(0.0, -2.0, -8.0) + offset,
            Vector3::new(0.0, -5.0, -5.0) + offset,
        )
    }

    fn provider(reset_on_tracking_loss: bool) -> RayProvider<VariableShoulderRaycaster> {
        RayProvider::new(
            VariableShoulderRaycaster::new(&RaycasterConfig::default()),
            reset_on_tracking_loss,
        )
    }

    #[test]
    fn test_tracks_hand_transitions() {
        let mut provider = provider(true);
        let head = HeadPose::identity();
        assert!(!provider.is_tracking());

        assert!(provider.step(0.0, &sample_at(Vector3::zeros()), &head).is_some());
        assert!(provider.is_tracking());

        assert!(provider.step(0.1, &JointSample::default(), &head).is_none());
        assert!(!provider.is_tracking());
    }

    #[test]
    fn test_tracking_loss_resets_filters() {
        let mut provider = provider(true);
        let head = HeadPose::identity();
        provider.step(0.0, &sample_at(Vector3::zeros()), &head);
        provider.step(0.1, &JointSample::default(), &head);

        // Reacquired far away: no smoothing from the stale pose
        let offset = Vector3::new(20.0, 0.0, 0.0);
        let ray = provider.step(0.2, &sample_at(offset), &head).unwrap();
        assert_relative_eq!(ray.locus, Vector3::new(20.0, 0.0, -5.0), epsilon = 1e-4);
    }

    #[test]
    fn test_tracking_loss_keeps_filters_when_disabled() {
        let mut provider = provider(false);
        let head = HeadPose::identity();
        provider.step(0.0, &sample_at(Vector3::zeros()), &head);
        provider.step(1.0 / 60.0, &JointSample::default(), &head);

        let ray = provider.step(2.0 / 60.0, &sample_at(Vector3::new(20.0, 0.0, 0.0)), &head).unwrap();
        assert!(ray.locus.x < 20.0, "locus.x = {} should lag", ray.locus.x);
    }

    #[test]
    fn test_backwards_timestamp_stays_finite() {
        let mut provider = provider(true);
        let head = HeadPose::identity();
        provider.step(5.0, &sample_at(Vector3::zeros()), &head);

        let ray = provider
            .step(4.0, &sample_at(Vector3::new(1.0, 1.0, 0.0)), &head)
            .unwrap();
        assert!(ray.locus.iter().all(|v| v.is_finite()));
        assert!(ray.direction.iter().all(|v| v.is_finite()));
        assert!(ray.locus.x >= 0.0 && ray.locus.x <= 1.0);
    }

    #[test]
    fn test_recovers_after_clock_restart() {
        let mut provider = provider(true);
        let head = HeadPose::identity();
        let dt = 1.0 / 60.0;
        for frame in 0..300 {
            provider.step(frame as f64 * dt, &sample_at(Vector3::zeros()), &head);
        }

        // Host clock restarts at zero while the hand moves and stays put
        let moved = sample_at(Vector3::new(20.0, 0.0, 0.0));
        let mut locus = Vector3::zeros();
        for frame in 0..120 {
            locus = provider.step(frame as f64 * dt, &moved, &head).unwrap().locus;
        }
        assert_relative_eq!(locus, Vector3::new(20.0, 0.0, -5.0), epsilon = 0.1);
    }
}
